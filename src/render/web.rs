//! `web-sys` DOM backend (wasm32 only).
//!
//! Every pane is a `div` with the pane's class, holding a clipped holder `div`
//! and a `table` translated by the pane's content origin. Borders are absolutely
//! positioned `div`s inside the holder.

use std::collections::HashMap;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlDivElement, HtmlElement, HtmlTableElement, HtmlTableRowElement};

use crate::error::{GridpaneError, Result};
use crate::layout::Axis;
use crate::overlay::{CloneElement, PaneKind};

use super::{Border, DomBackend, Geometry, PaneChanges, Rect, TableFragment, TrimmingContainer};

/// Default scrollbar thickness when it cannot be probed.
const FALLBACK_SCROLLBAR_WIDTH: f32 = 17.0;

#[allow(clippy::cast_possible_truncation)]
fn to_f32(value: f64) -> f32 {
    value as f32
}

#[allow(clippy::cast_possible_truncation)]
fn to_i32(value: f32) -> i32 {
    value.round() as i32
}

fn px(value: f32) -> String {
    format!("{value}px")
}

struct WebPane {
    clone: HtmlDivElement,
    holder: HtmlDivElement,
    table: HtmlTableElement,
    borders: HashMap<usize, HtmlDivElement>,
}

/// DOM backend over a root element in the live document.
pub struct WebDom {
    document: Document,
    root: HtmlElement,
    /// Nearest clipping ancestor, `None` when the window scrolls
    scroll_owner: Option<Element>,
    scrollbar_width: f32,
    panes: HashMap<PaneKind, WebPane>,
}

impl std::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDom")
            .field("window_container", &self.scroll_owner.is_none())
            .field("scrollbar_width", &self.scrollbar_width)
            .field("panes", &self.panes.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl WebDom {
    /// Attach to `root`. The trimming container is the nearest ancestor whose
    /// overflow clips, or the window.
    ///
    /// # Errors
    /// `GridpaneError::Dom` when there is no window or document.
    pub fn new(root: HtmlElement) -> Result<Self> {
        let window = web_sys::window().ok_or_else(|| GridpaneError::Dom("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| GridpaneError::Dom("no document".into()))?;

        let style = root.style();
        if style.get_property_value("position").unwrap_or_default().is_empty() {
            let _ = style.set_property("position", "relative");
        }

        let scroll_owner = find_scroll_owner(&root);
        let scrollbar_width = probe_scrollbar_width(&document).unwrap_or(FALLBACK_SCROLLBAR_WIDTH);
        log::debug!(
            "web backend attached, scrollbar {scrollbar_width}px, window container: {}",
            scroll_owner.is_none()
        );
        Ok(Self {
            document,
            root,
            scroll_owner,
            scrollbar_width,
            panes: HashMap::new(),
        })
    }

    fn container(&self) -> TrimmingContainer {
        if self.scroll_owner.is_some() {
            TrimmingContainer::Element
        } else {
            TrimmingContainer::Window
        }
    }

    fn create_div(&self, class: &str) -> Result<HtmlDivElement> {
        let div = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlDivElement>()
            .map_err(|_| GridpaneError::Dom("created element is not a div".into()))?;
        if !class.is_empty() {
            div.set_class_name(class);
        }
        Ok(div)
    }

    fn pane_mut(&mut self, pane: PaneKind) -> Result<&mut WebPane> {
        self.panes
            .get_mut(&pane)
            .ok_or_else(|| GridpaneError::Dom(format!("{pane} clone was never created")))
    }
}

fn find_scroll_owner(root: &HtmlElement) -> Option<Element> {
    let window = web_sys::window()?;
    let mut current = root.parent_element();
    while let Some(element) = current {
        let clips = window
            .get_computed_style(&element)
            .ok()
            .flatten()
            .is_some_and(|style| {
                ["overflow", "overflow-x", "overflow-y"].iter().any(|prop| {
                    matches!(
                        style.get_property_value(prop).unwrap_or_default().as_str(),
                        "auto" | "scroll" | "hidden"
                    )
                })
            });
        if clips {
            return Some(element);
        }
        current = element.parent_element();
    }
    None
}

fn probe_scrollbar_width(document: &Document) -> Option<f32> {
    let body = document.body()?;
    let probe = document
        .create_element("div")
        .ok()?
        .dyn_into::<HtmlDivElement>()
        .ok()?;
    let style = probe.style();
    let _ = style.set_property("position", "absolute");
    let _ = style.set_property("top", "-9999px");
    let _ = style.set_property("width", "100px");
    let _ = style.set_property("height", "100px");
    let _ = style.set_property("overflow", "scroll");
    body.append_child(&probe).ok()?;
    #[allow(clippy::cast_precision_loss)]
    let width = (probe.offset_width() - probe.client_width()) as f32;
    probe.remove();
    Some(width)
}

impl DomBackend for WebDom {
    fn is_attached(&self) -> bool {
        self.root.is_connected()
    }

    fn measure(&self) -> Geometry {
        let window = web_sys::window();
        let inner = |value: Option<wasm_bindgen::JsValue>| {
            value.and_then(|v| v.as_f64()).map_or(0.0, to_f32)
        };
        let window_width = inner(window.as_ref().and_then(|w| w.inner_width().ok()));
        let window_height = inner(window.as_ref().and_then(|w| w.inner_height().ok()));

        let bounds = self.root.get_bounding_client_rect();
        let table_rect = Rect::new(
            to_f32(bounds.x()),
            to_f32(bounds.y()),
            to_f32(bounds.width()),
            to_f32(bounds.height()),
        );

        #[allow(clippy::cast_precision_loss)]
        let (workspace_width, workspace_height, scroll_left, scroll_top) =
            match &self.scroll_owner {
                Some(owner) => (
                    owner.client_width() as f32,
                    owner.client_height() as f32,
                    owner.scroll_left() as f32,
                    owner.scroll_top() as f32,
                ),
                None => (
                    window_width,
                    window_height,
                    window.as_ref().and_then(|w| w.scroll_x().ok()).map_or(0.0, to_f32),
                    window.as_ref().and_then(|w| w.scroll_y().ok()).map_or(0.0, to_f32),
                ),
            };

        Geometry {
            container: self.container(),
            workspace_width,
            workspace_height,
            scrollbar_width: self.scrollbar_width,
            window_width,
            window_height,
            table_rect,
            scroll_left,
            scroll_top,
        }
    }

    fn set_scroll_position(&mut self, container: TrimmingContainer, axis: Axis, px: f32) -> bool {
        if container != self.container() {
            log::warn!("scroll write for {container:?} ignored, root scrolls in {:?}", self.container());
            return false;
        }
        let target = to_i32(px.max(0.0));
        match &self.scroll_owner {
            Some(owner) => {
                let current = match axis {
                    Axis::Vertical => owner.scroll_top(),
                    Axis::Horizontal => owner.scroll_left(),
                };
                if current == target {
                    return false;
                }
                match axis {
                    Axis::Vertical => owner.set_scroll_top(target),
                    Axis::Horizontal => owner.set_scroll_left(target),
                }
                true
            }
            None => {
                let Some(window) = web_sys::window() else {
                    return false;
                };
                let x = window.scroll_x().unwrap_or(0.0);
                let y = window.scroll_y().unwrap_or(0.0);
                let (x, y, current) = match axis {
                    Axis::Vertical => (x, f64::from(target), y),
                    Axis::Horizontal => (f64::from(target), y, x),
                };
                if (current - f64::from(target)).abs() < 0.5 {
                    return false;
                }
                window.scroll_to_with_x_and_y(x, y);
                true
            }
        }
    }

    fn create_clone(&mut self, pane: PaneKind) -> Result<()> {
        let clone = self.create_div(pane.class_name())?;
        let holder = self.create_div("wtHolder")?;
        let table = self
            .document
            .create_element("table")?
            .dyn_into::<HtmlTableElement>()
            .map_err(|_| GridpaneError::Dom("created element is not a table".into()))?;
        table.set_class_name("htCore");

        let clone_style = clone.style();
        let _ = clone_style.set_property("overflow", "hidden");
        if pane == PaneKind::Master {
            let _ = clone_style.set_property("position", "relative");
        } else {
            let _ = clone_style.set_property("position", "absolute");
            let _ = clone_style.set_property("top", "0");
            let _ = clone_style.set_property("left", "0");
            let _ = clone_style.set_property("z-index", "1");
        }
        let holder_style = holder.style();
        let _ = holder_style.set_property("position", "relative");
        let _ = holder_style.set_property("overflow", "hidden");
        let table_style = table.style();
        let _ = table_style.set_property("position", "absolute");
        let _ = table_style.set_property("table-layout", "fixed");
        let _ = table_style.set_property("border-collapse", "collapse");

        holder.append_child(&table)?;
        clone.append_child(&holder)?;
        self.root.append_child(&clone)?;
        self.panes.insert(
            pane,
            WebPane {
                clone,
                holder,
                table,
                borders: HashMap::new(),
            },
        );
        Ok(())
    }

    fn destroy_clone(&mut self, pane: PaneKind) {
        if let Some(web_pane) = self.panes.remove(&pane) {
            web_pane.clone.remove();
        }
    }

    fn commit_pane(
        &mut self,
        pane: PaneKind,
        element: &CloneElement,
        fragment: &TableFragment,
        changes: PaneChanges,
    ) -> Result<()> {
        let web_pane = self.pane_mut(pane)?;
        if changes.element {
            write_element(web_pane, pane, element);
        }
        if changes.fragment {
            write_fragment(&web_pane.table, fragment)?;
        }
        Ok(())
    }

    fn commit_border(&mut self, pane: PaneKind, index: usize, border: &Border) -> Result<()> {
        if !self.panes.contains_key(&pane) {
            return Err(GridpaneError::Dom(format!("{pane} clone was never created")));
        }
        let div = match self.panes.get(&pane).and_then(|p| p.borders.get(&index)) {
            Some(div) => div.clone(),
            None => {
                let div = self.create_div("wtBorder")?;
                let style = div.style();
                let _ = style.set_property("position", "absolute");
                let _ = style.set_property("pointer-events", "none");
                let web_pane = self.pane_mut(pane)?;
                web_pane.holder.append_child(&div)?;
                web_pane.borders.insert(index, div.clone());
                div
            }
        };

        let style = div.style();
        let Some(rect) = border.rect() else {
            let _ = style.set_property("display", "none");
            return Ok(());
        };
        let spec = border.spec();
        let stroke = format!("{} solid {}", px(spec.width), spec.color);
        let edge = |visible: bool| if visible { stroke.as_str() } else { "none" };
        let _ = style.set_property("display", "block");
        let _ = style.set_property("left", &px(rect.x));
        let _ = style.set_property("top", &px(rect.y));
        let _ = style.set_property("width", &px(rect.w));
        let _ = style.set_property("height", &px(rect.h));
        let _ = style.set_property("box-sizing", "border-box");
        let _ = style.set_property("border-top", edge(rect.draw_top));
        let _ = style.set_property("border-bottom", edge(rect.draw_bottom));
        let _ = style.set_property("border-left", edge(rect.draw_left));
        let _ = style.set_property("border-right", edge(rect.draw_right));
        Ok(())
    }
}

fn write_element(web_pane: &WebPane, pane: PaneKind, element: &CloneElement) {
    let clone_style = web_pane.clone.style();
    if pane != PaneKind::Master {
        let _ = clone_style.set_property("left", &px(element.left));
        let _ = clone_style.set_property("top", &px(element.top));
    }
    let _ = clone_style.set_property("width", &px(element.width));
    let _ = clone_style.set_property("height", &px(element.height));

    if let Some(class) = pane.inner_border_class() {
        let classes = web_pane.clone.class_list();
        let _ = if element.inner_border {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
    }

    let holder_style = web_pane.holder.style();
    let _ = holder_style.set_property("width", &px(element.holder_width));
    let _ = holder_style.set_property("height", &px(element.holder_height));

    let table_style = web_pane.table.style();
    let _ = table_style.set_property("left", &px(element.content_left));
    let _ = table_style.set_property("top", &px(element.content_top));
}

fn write_fragment(table: &HtmlTableElement, fragment: &TableFragment) -> Result<()> {
    table.set_inner_html("");
    let mut current: Option<(i64, HtmlTableRowElement)> = None;
    for cell in fragment.cells() {
        let row = match current.take() {
            Some((coord, row)) if coord == cell.coords.row => row,
            _ => table
                .insert_row()?
                .dyn_into::<HtmlTableRowElement>()
                .map_err(|_| GridpaneError::Dom("inserted row is not a tr".into()))?,
        };
        let td = row.insert_cell()?;
        td.set_text_content(Some(&cell.value));
        if !cell.classes().is_empty() {
            td.set_class_name(&cell.classes().join(" "));
        }
        let style = td.style();
        let _ = style.set_property("width", &px(cell.rect.width));
        let _ = style.set_property("height", &px(cell.rect.height));
        current = Some((cell.coords.row, row));
    }
    Ok(())
}

impl WebDom {
    /// Target that receives native scroll events for this grid.
    pub fn scroll_event_target(&self) -> Option<web_sys::EventTarget> {
        match &self.scroll_owner {
            Some(owner) => Some(owner.clone().into()),
            None => web_sys::window().map(Into::into),
        }
    }
}
