//! Selection reconciler.
//!
//! Applies one selection layer to one pane's fragment: header highlight
//! classes, body classes, then the layer's border. Kept free of DOM access so
//! the class and border math stays testable.

use crate::overlay::PaneKind;
use crate::settings::Hooks;
use crate::types::{index_to_coord, CellCoords, Corners, Selection};

use super::{BorderRegistry, TableFragment};

/// Reconcile selection layer `index` into `fragment` and its border in `pane`.
pub fn draw_selection(
    selection: &Selection,
    index: usize,
    pane: PaneKind,
    fragment: &mut TableFragment,
    borders: &mut BorderRegistry,
    hooks: &mut Hooks,
) {
    let style = &selection.style;
    let Some(corners) = selection.corners() else {
        if style.border.is_some() {
            if let Some(border) = borders.get_mut(pane, index) {
                border.disappear();
            }
        }
        return;
    };

    let rows: Vec<usize> = fragment.rows().iter().map(|l| l.source).collect();
    let columns: Vec<usize> = fragment.columns().iter().map(|l| l.source).collect();

    if let Some(class) = style.highlight_header_class.as_deref() {
        highlight_column_headers(fragment, &columns, corners, class);
        highlight_row_headers(fragment, &rows, corners, class);
    }

    let header_only = rows.is_empty() || columns.is_empty();
    if !header_only {
        highlight_body(selection, fragment, &rows, &columns, corners);
    }

    let Some(spec) = style.border.as_ref() else {
        return;
    };
    let border = borders.border_mut(pane, index, spec);
    if header_only {
        border.disappear();
        return;
    }
    hooks.before_draw_borders(corners, style.class_name.as_deref().unwrap_or_default());
    border.appear(corners, fragment);
}

fn highlight_column_headers(
    fragment: &mut TableFragment,
    columns: &[usize],
    corners: Corners,
    class: &str,
) {
    let levels = index_to_coord(fragment.column_header_levels());
    for &col in columns {
        let col = index_to_coord(col);
        if !corners.contains_col(col) {
            continue;
        }
        for row in -levels..0 {
            fragment.add_class(CellCoords::new(row, col), class);
        }
    }
}

fn highlight_row_headers(fragment: &mut TableFragment, rows: &[usize], corners: Corners, class: &str) {
    let levels = index_to_coord(fragment.row_header_levels());
    for &row in rows {
        let row = index_to_coord(row);
        if !corners.contains_row(row) {
            continue;
        }
        for col in -levels..0 {
            fragment.add_class(CellCoords::new(row, col), class);
        }
    }
}

fn highlight_body(
    selection: &Selection,
    fragment: &mut TableFragment,
    rows: &[usize],
    columns: &[usize],
    corners: Corners,
) {
    let style = &selection.style;
    for &row in rows {
        let row = index_to_coord(row);
        let row_hit = corners.contains_row(row);
        for &col in columns {
            let col = index_to_coord(col);
            let col_hit = corners.contains_col(col);
            let class = match (row_hit, col_hit) {
                (true, true) => style.class_name.as_deref(),
                (true, false) => style.highlight_row_class.as_deref(),
                (false, true) => style.highlight_column_class.as_deref(),
                (false, false) => None,
            };
            if let Some(class) = class {
                fragment.add_class(CellCoords::new(row, col), class);
            }
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::layout::{IndexFilter, RenderCalculator};
    use crate::render::HeaderBands;
    use crate::settings::{IndexValue, Settings};
    use crate::types::{CellRange, SelectionStyle};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn settings() -> Settings {
        let mut settings = Settings::new(20, 10);
        settings.row_headers = vec![IndexValue::Value(String::new())];
        settings.column_headers = vec![IndexValue::Value(String::new())];
        settings
    }

    fn master(settings: &Settings) -> TableFragment {
        let rows = RenderCalculator::new(20, 0, 0, 1000.0, false).compute(|_| 23.0);
        let cols = RenderCalculator::new(10, 0, 0, 1000.0, false).compute(|_| 50.0);
        TableFragment::build(
            settings,
            IndexFilter::new(0, rows, 20),
            IndexFilter::new(0, cols, 10),
            HeaderBands {
                rows: true,
                columns: true,
            },
        )
    }

    fn row_style() -> SelectionStyle {
        SelectionStyle {
            class_name: Some("area".to_string()),
            highlight_row_class: Some("hl-row".to_string()),
            highlight_column_class: Some("hl-col".to_string()),
            highlight_header_class: Some("hl-header".to_string()),
            border: Some(Default::default()),
        }
    }

    #[test]
    fn classes_follow_normalised_corners() {
        let settings = settings();
        let mut fragment = master(&settings);
        let mut selection = Selection::new(row_style());
        // Inverted range
        selection.set_range(CellRange::new(
            CellCoords::new(3, 3),
            CellCoords::new(3, 3),
            CellCoords::new(1, 1),
        ));
        let mut borders = BorderRegistry::new();
        draw_selection(
            &selection,
            0,
            PaneKind::Master,
            &mut fragment,
            &mut borders,
            &mut Hooks::default(),
        );

        let has = |r, c, class| fragment.cell(CellCoords::new(r, c)).unwrap().has_class(class);
        assert!(has(1, 1, "area"));
        assert!(has(3, 3, "area"));
        assert!(has(2, 7, "hl-row"));
        assert!(has(9, 2, "hl-col"));
        assert!(!has(9, 9, "hl-row"));
        assert!(has(-1, 2, "hl-header"));
        assert!(has(2, -1, "hl-header"));
        assert!(!has(-1, 5, "hl-header"));
        assert!(borders.get(PaneKind::Master, 0).unwrap().is_visible());
    }

    #[test]
    fn empty_selection_hides_existing_border() {
        let settings = settings();
        let mut fragment = master(&settings);
        let mut borders = BorderRegistry::new();
        let mut hooks = Hooks::default();
        let mut selection = Selection::new(SelectionStyle::current());
        selection.add(CellCoords::new(0, 0));
        draw_selection(&selection, 0, PaneKind::Master, &mut fragment, &mut borders, &mut hooks);
        assert!(borders.get(PaneKind::Master, 0).unwrap().is_visible());

        selection.clear();
        fragment.clear_classes();
        draw_selection(&selection, 0, PaneKind::Master, &mut fragment, &mut borders, &mut hooks);
        assert!(!borders.get(PaneKind::Master, 0).unwrap().is_visible());
        assert!(fragment.cells().iter().all(|c| c.classes().is_empty()));
    }

    #[test]
    fn header_only_fragment_runs_row_header_pass() {
        let settings = settings();
        let rows = RenderCalculator::new(20, 0, 0, 1000.0, false).compute(|_| 23.0);
        let mut fragment = TableFragment::build(
            &settings,
            IndexFilter::new(0, rows, 20),
            IndexFilter::fixed_only(0, 10),
            HeaderBands {
                rows: true,
                columns: true,
            },
        );
        let mut selection = Selection::new(row_style());
        selection.add(CellCoords::new(4, 4));
        let mut borders = BorderRegistry::new();
        draw_selection(
            &selection,
            0,
            PaneKind::Left,
            &mut fragment,
            &mut borders,
            &mut Hooks::default(),
        );
        assert!(fragment.cell(CellCoords::new(4, -1)).unwrap().has_class("hl-header"));
        assert!(!borders.get(PaneKind::Left, 0).unwrap().is_visible());
    }

    #[test]
    fn hook_sees_corners_and_class() {
        let settings = settings();
        let mut fragment = master(&settings);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut hooks = Hooks {
            on_before_draw_borders: Some(Box::new(move |corners: Corners, class: &str| {
                sink.borrow_mut().push((corners.as_tuple(), class.to_string()));
            })),
            ..Hooks::default()
        };
        let mut selection = Selection::new(SelectionStyle::area());
        selection.add(CellCoords::new(2, 2)).add(CellCoords::new(0, 1));
        draw_selection(
            &selection,
            1,
            PaneKind::Master,
            &mut fragment,
            &mut BorderRegistry::new(),
            &mut hooks,
        );
        assert_eq!(*seen.borrow(), vec![((0, 1, 2, 2), "area".to_string())]);
    }

    #[test]
    fn empty_grid_never_fails() {
        let settings = Settings::new(0, 0);
        let mut fragment = TableFragment::build(
            &settings,
            IndexFilter::fixed_only(0, 0),
            IndexFilter::fixed_only(0, 0),
            HeaderBands::default(),
        );
        let mut selection = Selection::new(SelectionStyle::current());
        selection.add(CellCoords::new(0, 0));
        let mut borders = BorderRegistry::new();
        draw_selection(
            &selection,
            0,
            PaneKind::Master,
            &mut fragment,
            &mut borders,
            &mut Hooks::default(),
        );
        assert!(!borders.get(PaneKind::Master, 0).unwrap().is_visible());
    }
}
