//! Table fragments: the rows, columns, headers and cells one pane materialises.
//!
//! Positions are local to the fragment's table. Header bands come first, then
//! rendered units in rendered order, laid out contiguously. The pane's content
//! origin places the table inside its clone.

use crate::layout::{ColumnFilter, RowFilter};
use crate::settings::Settings;
use crate::types::{index_to_coord, CellCoords};

use super::Rect;

/// One rendered row or column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedLine {
    pub source: usize,
    /// Offset from the fragment's top (rows) or left (columns) edge
    pub position: f32,
    pub size: f32,
}

impl RenderedLine {
    pub fn end(&self) -> f32 {
        self.position + self.size
    }
}

/// One rendered cell, header cells included.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedCell {
    pub coords: CellCoords,
    pub rect: Rect,
    pub value: String,
    classes: Vec<String>,
}

impl RenderedCell {
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Returns whether the class was newly added.
    pub fn add_class(&mut self, class: &str) -> bool {
        if self.has_class(class) {
            return false;
        }
        self.classes.push(class.to_string());
        true
    }
}

/// Which header bands a fragment renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeaderBands {
    pub rows: bool,
    pub columns: bool,
}

/// Rendered table of one pane.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableFragment {
    row_filter: RowFilter,
    column_filter: ColumnFilter,
    rows: Vec<RenderedLine>,
    columns: Vec<RenderedLine>,
    row_header_levels: usize,
    column_header_levels: usize,
    row_header_width: f32,
    column_header_height: f32,
    cells: Vec<RenderedCell>,
}

impl TableFragment {
    pub fn build(
        settings: &Settings,
        row_filter: RowFilter,
        column_filter: ColumnFilter,
        headers: HeaderBands,
    ) -> Self {
        let row_header_levels = if headers.rows {
            settings.row_header_count()
        } else {
            0
        };
        let column_header_levels = if headers.columns {
            settings.column_header_count()
        } else {
            0
        };
        let row_header_width = settings.row_header_width;
        let column_header_height = settings.column_header_height;

        let rows = lines(
            row_filter.sources(),
            column_header_levels as f32 * column_header_height,
            |i| settings.row_height(i),
        );
        let columns = lines(
            column_filter.sources(),
            row_header_levels as f32 * row_header_width,
            |i| settings.column_width(i),
        );

        let mut fragment = Self {
            row_filter,
            column_filter,
            rows,
            columns,
            row_header_levels,
            column_header_levels,
            row_header_width,
            column_header_height,
            cells: Vec::new(),
        };
        fragment.cells = fragment.materialise(settings);
        fragment
    }

    fn materialise(&self, settings: &Settings) -> Vec<RenderedCell> {
        let header_rows = (0..self.column_header_levels).map(|level| {
            let y = level as f32 * self.column_header_height;
            (
                Slot::Header(level, self.column_header_levels),
                y,
                self.column_header_height,
            )
        });
        let body_rows = self
            .rows
            .iter()
            .map(|line| (Slot::Body(line.source), line.position, line.size));
        let row_slots: Vec<_> = header_rows.chain(body_rows).collect();

        let header_cols = (0..self.row_header_levels).map(|level| {
            let x = level as f32 * self.row_header_width;
            (
                Slot::Header(level, self.row_header_levels),
                x,
                self.row_header_width,
            )
        });
        let body_cols = self
            .columns
            .iter()
            .map(|line| (Slot::Body(line.source), line.position, line.size));
        let col_slots: Vec<_> = header_cols.chain(body_cols).collect();

        let mut cells = Vec::with_capacity(row_slots.len() * col_slots.len());
        for &(row, y, height) in &row_slots {
            for &(col, x, width) in &col_slots {
                let value = match (row, col) {
                    (Slot::Body(r), Slot::Body(c)) => settings.cell_value(r, c),
                    (Slot::Header(level, _), Slot::Body(c)) => {
                        settings.column_header(level, c).unwrap_or_default()
                    }
                    (Slot::Body(r), Slot::Header(level, _)) => {
                        settings.row_header(level, r).unwrap_or_default()
                    }
                    (Slot::Header(..), Slot::Header(..)) => String::new(),
                };
                cells.push(RenderedCell {
                    coords: CellCoords::new(row.coord(), col.coord()),
                    rect: Rect::new(x, y, width, height),
                    value,
                    classes: Vec::new(),
                });
            }
        }
        cells
    }

    pub fn row_filter(&self) -> &RowFilter {
        &self.row_filter
    }

    pub fn column_filter(&self) -> &ColumnFilter {
        &self.column_filter
    }

    /// Rendered body rows in rendered order.
    pub fn rows(&self) -> &[RenderedLine] {
        &self.rows
    }

    /// Rendered body columns in rendered order.
    pub fn columns(&self) -> &[RenderedLine] {
        &self.columns
    }

    pub fn row_header_levels(&self) -> usize {
        self.row_header_levels
    }

    pub fn column_header_levels(&self) -> usize {
        self.column_header_levels
    }

    pub fn has_body_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn has_body_columns(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn row(&self, source: usize) -> Option<&RenderedLine> {
        self.row_filter
            .source_to_rendered(source)
            .and_then(|i| self.rows.get(i))
    }

    pub fn column(&self, source: usize) -> Option<&RenderedLine> {
        self.column_filter
            .source_to_rendered(source)
            .and_then(|i| self.columns.get(i))
    }

    pub fn width(&self) -> f32 {
        self.columns.last().map_or(
            self.row_header_levels as f32 * self.row_header_width,
            RenderedLine::end,
        )
    }

    pub fn height(&self) -> f32 {
        self.rows.last().map_or(
            self.column_header_levels as f32 * self.column_header_height,
            RenderedLine::end,
        )
    }

    pub fn cells(&self) -> &[RenderedCell] {
        &self.cells
    }

    pub fn cell(&self, coords: CellCoords) -> Option<&RenderedCell> {
        self.cell_index(coords).and_then(|i| self.cells.get(i))
    }

    pub fn cell_mut(&mut self, coords: CellCoords) -> Option<&mut RenderedCell> {
        self.cell_index(coords).and_then(|i| self.cells.get_mut(i))
    }

    /// Returns whether the cell is rendered here and the class was newly added.
    pub fn add_class(&mut self, coords: CellCoords, class: &str) -> bool {
        self.cell_mut(coords).is_some_and(|cell| cell.add_class(class))
    }

    pub fn clear_classes(&mut self) {
        for cell in &mut self.cells {
            cell.classes.clear();
        }
    }

    fn cell_index(&self, coords: CellCoords) -> Option<usize> {
        let row = slot_index(
            coords.row,
            self.column_header_levels,
            |s| self.row_filter.source_to_rendered(s),
        )?;
        let col = slot_index(
            coords.col,
            self.row_header_levels,
            |s| self.column_filter.source_to_rendered(s),
        )?;
        let width = self.row_header_levels + self.columns.len();
        Some(row * width + col)
    }
}

/// A header level (with the band's level count) or a body source index.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Header(usize, usize),
    Body(usize),
}

impl Slot {
    /// Header level `l` of `n` sits at `l - n`, so the level nearest the body is -1.
    fn coord(self) -> i64 {
        match self {
            Self::Header(level, count) => index_to_coord(level) - index_to_coord(count),
            Self::Body(source) => index_to_coord(source),
        }
    }
}

fn lines(
    sources: impl Iterator<Item = usize>,
    origin: f32,
    size_of: impl Fn(usize) -> f32,
) -> Vec<RenderedLine> {
    let mut position = origin;
    sources
        .map(|source| {
            let size = size_of(source);
            let line = RenderedLine {
                source,
                position,
                size,
            };
            position += size;
            line
        })
        .collect()
}

fn slot_index(
    coord: i64,
    header_levels: usize,
    source_to_rendered: impl Fn(usize) -> Option<usize>,
) -> Option<usize> {
    if coord < 0 {
        let level = index_to_coord(header_levels) + coord;
        return usize::try_from(level).ok();
    }
    let source = usize::try_from(coord).ok()?;
    source_to_rendered(source).map(|rendered| header_levels + rendered)
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
    use crate::settings::IndexValue;
    use std::rc::Rc;

    fn settings() -> Settings {
        let mut settings = Settings::new(100, 10);
        settings.default_row_height = 20.0;
        settings.default_column_width = 40.0;
        settings.row_headers = vec![IndexValue::from_fn(|r| (r + 1).to_string())];
        settings.column_headers = vec![
            IndexValue::Value("Group".to_string()),
            IndexValue::from_fn(crate::settings::col_to_letter),
        ];
        settings.cell_value = Some(Rc::new(|r, c| format!("{r}:{c}")));
        settings
    }

    fn fragment(settings: &Settings, headers: HeaderBands) -> TableFragment {
        let rows = RenderCalculator::new(100, 2, 10, 60.0, false).compute(|_| 20.0);
        let cols = RenderCalculator::new(10, 0, 0, 80.0, false).compute(|_| 40.0);
        TableFragment::build(
            settings,
            IndexFilter::new(2, rows, 100),
            IndexFilter::new(0, cols, 10),
            headers,
        )
    }

    #[test]
    fn body_lines_are_contiguous_after_headers() {
        let settings = settings();
        let frag = fragment(
            &settings,
            HeaderBands {
                rows: true,
                columns: true,
            },
        );
        let sources: Vec<_> = frag.rows().iter().map(|l| l.source).collect();
        assert_eq!(sources, vec![0, 1, 12, 13, 14]);
        assert_eq!(frag.rows()[0].position, 46.0);
        assert_eq!(frag.rows()[2].position, 86.0);
        assert_eq!(frag.columns()[0].position, 50.0);
        assert_eq!(frag.height(), 146.0);
        assert_eq!(frag.width(), 130.0);
    }

    #[test]
    fn header_cells_use_negative_coords() {
        let settings = settings();
        let frag = fragment(
            &settings,
            HeaderBands {
                rows: true,
                columns: true,
            },
        );
        assert_eq!(frag.cell(CellCoords::new(-2, 1)).unwrap().value, "Group");
        assert_eq!(frag.cell(CellCoords::new(-1, 1)).unwrap().value, "B");
        assert_eq!(frag.cell(CellCoords::new(12, -1)).unwrap().value, "13");
        assert_eq!(frag.cell(CellCoords::new(-1, -1)).unwrap().value, "");
        assert!(frag.cell(CellCoords::new(-3, 0)).is_none());
        assert!(frag.cell(CellCoords::new(0, -2)).is_none());
    }

    #[test]
    fn body_lookup_follows_filters() {
        let settings = settings();
        let frag = fragment(&settings, HeaderBands::default());
        let cell = frag.cell(CellCoords::new(13, 1)).unwrap();
        assert_eq!(cell.value, "13:1");
        assert_eq!(cell.rect, Rect::new(40.0, 60.0, 40.0, 20.0));
        assert!(frag.cell(CellCoords::new(5, 1)).is_none());
        assert!(frag.cell(CellCoords::new(-1, 1)).is_none());
    }

    #[test]
    fn classes_are_deduplicated_and_cleared() {
        let settings = settings();
        let mut frag = fragment(&settings, HeaderBands::default());
        let coords = CellCoords::new(0, 0);
        assert!(frag.add_class(coords, "area"));
        assert!(!frag.add_class(coords, "area"));
        assert!(!frag.add_class(CellCoords::new(50, 0), "area"));
        assert_eq!(frag.cell(coords).unwrap().classes(), ["area".to_string()]);
        frag.clear_classes();
        assert!(frag.cell(coords).unwrap().classes().is_empty());
    }

    #[test]
    fn header_only_fragment() {
        let settings = settings();
        let frag = TableFragment::build(
            &settings,
            IndexFilter::fixed_only(2, 100),
            IndexFilter::fixed_only(0, 10),
            HeaderBands {
                rows: true,
                columns: false,
            },
        );
        assert!(!frag.has_body_columns());
        assert!(frag.has_body_rows());
        assert_eq!(frag.cells().len(), 2);
        assert_eq!(frag.width(), 50.0);
    }
}
