//! JavaScript entry point (wasm32 only).
//!
//! `WebGrid` wraps a `GridView<WebDom>` in shared state so the native scroll
//! listener and the exported methods drive the same view.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlElement};

use crate::error::GridpaneError;
use crate::layout::Axis;
use crate::render::WebDom;
use crate::settings::{DrawKind, Settings, SettingsConfig};
use crate::types::{CellCoords, CellRange, Selection, SelectionStyle};
use crate::viewer::GridView;

type SharedGrid = Rc<RefCell<GridView<WebDom>>>;

#[wasm_bindgen]
pub struct WebGrid {
    grid: SharedGrid,
    #[allow(dead_code)] // Kept alive for the lifetime of the listener
    scroll_closure: Option<Closure<dyn FnMut(Event)>>,
    /// Index of the primary cell selection layer
    current: usize,
}

impl WebGrid {
    /// Exclusive access to the view. Fails while a draw or a hook it fired
    /// still holds the view, as when a JS hook calls back into the grid.
    fn view_mut(&self) -> Result<RefMut<'_, GridView<WebDom>>, GridpaneError> {
        self.grid
            .try_borrow_mut()
            .map_err(|_| GridpaneError::ReentrantDraw)
    }

    fn view(&self) -> Result<Ref<'_, GridView<WebDom>>, GridpaneError> {
        self.grid.try_borrow().map_err(|_| GridpaneError::ReentrantDraw)
    }
}

#[wasm_bindgen]
impl WebGrid {
    /// Attach a grid to `root` with a configuration object (see `SettingsConfig`).
    #[wasm_bindgen(constructor)]
    pub fn new(root: HtmlElement, config: JsValue) -> Result<WebGrid, JsValue> {
        console_error_panic_hook::set_once();

        let config: SettingsConfig = if config.is_undefined() || config.is_null() {
            SettingsConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let backend = WebDom::new(root)?;
        let target = backend.scroll_event_target();
        let mut grid = GridView::new(Settings::from_config(&config), backend)?;
        let current = grid
            .selections_mut()
            .push(Selection::new(SelectionStyle::current()));
        let grid = Rc::new(RefCell::new(grid));

        let scroll_closure = target.map(|target| {
            let state = Rc::clone(&grid);
            let closure = Closure::wrap(Box::new(move |_event: Event| {
                // A draw in progress already reads the latest position
                let Ok(mut grid) = state.try_borrow_mut() else {
                    return;
                };
                if let Err(e) = grid.on_native_scroll() {
                    log::warn!("native scroll failed: {e}");
                }
            }) as Box<dyn FnMut(Event)>);
            target
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())
                .ok();
            closure
        });

        Ok(WebGrid {
            grid,
            scroll_closure,
            current,
        })
    }

    /// Use `callback(row, col)` to fetch cell text. Non-string results render empty.
    pub fn set_data_source(&self, callback: Function) -> Result<(), JsValue> {
        let mut grid = self.view_mut()?;
        let mut settings = grid.settings().clone();
        settings.cell_value = Some(Rc::new(move |row: usize, col: usize| {
            #[allow(clippy::cast_precision_loss)]
            let (row, col) = (row as f64, col as f64);
            callback
                .call2(&JsValue::NULL, &JsValue::from_f64(row), &JsValue::from_f64(col))
                .ok()
                .and_then(|value| value.as_string())
                .unwrap_or_default()
        }));
        grid.update_settings(settings)?;
        Ok(())
    }

    /// Replace the configuration. Scroll offsets are kept where still valid.
    pub fn update_settings(&self, config: JsValue) -> Result<(), JsValue> {
        let config: SettingsConfig = serde_wasm_bindgen::from_value(config)?;
        let mut grid = self.view_mut()?;
        let mut settings = Settings::from_config(&config);
        settings.cell_value = grid.settings().cell_value.clone();
        grid.update_settings(settings)?;
        Ok(())
    }

    pub fn draw(&self, fast: bool) -> Result<(), JsValue> {
        self.view_mut()?.draw(fast)?;
        Ok(())
    }

    pub fn resize(&self) -> Result<(), JsValue> {
        self.view_mut()?.resize()?;
        Ok(())
    }

    pub fn scroll_vertical(&self, delta: i32) -> Result<bool, JsValue> {
        let mut grid = self.view_mut()?;
        let changed = grid.scroll_vertical(i64::from(delta))?;
        grid.draw(true)?;
        Ok(changed)
    }

    pub fn scroll_horizontal(&self, delta: i32) -> Result<bool, JsValue> {
        let mut grid = self.view_mut()?;
        let changed = grid.scroll_horizontal(i64::from(delta))?;
        grid.draw(true)?;
        Ok(changed)
    }

    /// Wheel delta in pixels on both axes.
    pub fn scroll_by_pixels(&self, dx: f32, dy: f32) -> Result<bool, JsValue> {
        let mut grid = self.view_mut()?;
        let vertical = grid.scroll_by_pixels(Axis::Vertical, dy)?;
        let horizontal = grid.scroll_by_pixels(Axis::Horizontal, dx)?;
        grid.draw(true)?;
        Ok(vertical || horizontal)
    }

    pub fn scroll_viewport_to(&self, row: i32, col: i32) -> Result<bool, JsValue> {
        let changed = self
            .view_mut()?
            .scroll_viewport_to(CellCoords::new(i64::from(row), i64::from(col)))?;
        Ok(changed)
    }

    /// Select the range between two cells and redraw.
    pub fn select(&self, row: i32, col: i32, to_row: i32, to_col: i32) -> Result<(), JsValue> {
        let from = CellCoords::new(i64::from(row), i64::from(col));
        let to = CellCoords::new(i64::from(to_row), i64::from(to_col));
        let mut grid = self.view_mut()?;
        if let Some(selection) = grid.selections_mut().get_mut(self.current) {
            selection.set_range(CellRange::new(from, from, to));
        }
        grid.draw(true)?;
        Ok(())
    }

    pub fn clear_selection(&self) -> Result<(), JsValue> {
        let mut grid = self.view_mut()?;
        if let Some(selection) = grid.selections_mut().get_mut(self.current) {
            selection.clear();
        }
        grid.draw(true)?;
        Ok(())
    }

    /// Call `callback("vertical" | "horizontal")` whenever an axis scrolls.
    pub fn on_scroll(&self, callback: Function) -> Result<(), JsValue> {
        let mut grid = self.view_mut()?;
        let hooks = grid.hooks_mut();
        let vertical = callback.clone();
        hooks.on_scroll_vertically = Some(Box::new(move || {
            let _ = vertical.call1(&JsValue::NULL, &JsValue::from_str("vertical"));
        }));
        hooks.on_scroll_horizontally = Some(Box::new(move || {
            let _ = callback.call1(&JsValue::NULL, &JsValue::from_str("horizontal"));
        }));
        Ok(())
    }

    /// Call `callback(fast)` after every completed draw.
    pub fn on_draw(&self, callback: Function) -> Result<(), JsValue> {
        self.view_mut()?.hooks_mut().on_draw = Some(Box::new(move |kind: DrawKind| {
            let fast = JsValue::from_bool(kind == DrawKind::Fast);
            let _ = callback.call1(&JsValue::NULL, &fast);
        }));
        Ok(())
    }

    pub fn first_visible_row(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.first_visible_row())
    }

    pub fn last_visible_row(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.last_visible_row())
    }

    pub fn first_visible_column(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.first_visible_column())
    }

    pub fn last_visible_column(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.last_visible_column())
    }

    pub fn first_fully_visible_row(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.first_fully_visible_row())
    }

    pub fn last_fully_visible_row(&self) -> Result<Option<usize>, JsValue> {
        Ok(self.view()?.last_fully_visible_row())
    }

    /// Text of the rendered cell at `(row, col)`, `undefined` when not rendered.
    pub fn cell_text(&self, row: i32, col: i32) -> Result<Option<String>, JsValue> {
        Ok(self
            .view()?
            .get_cell(CellCoords::new(i64::from(row), i64::from(col)))
            .map(|cell| cell.value.clone()))
    }
}
