use serde::{Deserialize, Serialize};

use super::{CellCoords, CellRange, Corners};

/// Border drawn around a selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderSpec {
    /// Stroke width in pixels
    pub width: f32,
    /// CSS color of the stroke
    pub color: String,
    /// Whether the fill handle square is shown at the bottom-right corner
    pub corner_visible: bool,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            width: 2.0,
            color: "#4B89FF".to_string(),
            corner_visible: true,
        }
    }
}

/// Class names applied to rendered cells and headers for one selection layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectionStyle {
    /// Applied to body cells inside the range
    pub class_name: Option<String>,
    /// Applied to body cells sharing a row with the range
    pub highlight_row_class: Option<String>,
    /// Applied to body cells sharing a column with the range
    pub highlight_column_class: Option<String>,
    /// Applied to row and column headers covering the range
    pub highlight_header_class: Option<String>,
    pub border: Option<BorderSpec>,
}

impl SelectionStyle {
    /// Style of the primary cell selection.
    pub fn current() -> Self {
        Self {
            class_name: Some("current".to_string()),
            highlight_header_class: Some("ht__highlight".to_string()),
            border: Some(BorderSpec::default()),
            ..Self::default()
        }
    }

    /// Style of a filled area selection.
    pub fn area() -> Self {
        Self {
            class_name: Some("area".to_string()),
            highlight_header_class: Some("ht__highlight".to_string()),
            border: Some(BorderSpec {
                width: 1.0,
                corner_visible: false,
                ..BorderSpec::default()
            }),
            ..Self::default()
        }
    }
}

/// One selection layer: an optional range plus how it is drawn.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    range: Option<CellRange>,
    pub style: SelectionStyle,
}

impl Selection {
    pub fn new(style: SelectionStyle) -> Self {
        Self { range: None, style }
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }

    pub fn range(&self) -> Option<&CellRange> {
        self.range.as_ref()
    }

    /// Start a range at `coords`, or expand the existing one to cover it.
    pub fn add(&mut self, coords: CellCoords) -> &mut Self {
        match &mut self.range {
            Some(range) => {
                range.expand(coords);
            }
            None => self.range = Some(CellRange::single(coords)),
        }
        self
    }

    /// Replace the range, keeping `from`/`to` exactly as given.
    pub fn set_range(&mut self, range: CellRange) -> &mut Self {
        self.range = Some(range);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.range = None;
        self
    }

    /// Normalised corners, `None` when empty.
    pub fn corners(&self) -> Option<Corners> {
        self.range.as_ref().map(CellRange::corners)
    }
}

/// Ordered selection layers, drawn first to last.
#[derive(Debug, Clone, Default)]
pub struct Selections {
    layers: Vec<Selection>,
}

impl Selections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer and return its index.
    pub fn push(&mut self, selection: Selection) -> usize {
        self.layers.push(selection);
        self.layers.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Selection> {
        self.layers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Selection> {
        self.layers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selection> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Empty every layer without removing it (border objects stay reusable).
    pub fn clear_all(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn add_starts_then_expands() {
        let mut sel = Selection::new(SelectionStyle::current());
        assert!(sel.is_empty());
        sel.add(CellCoords::new(5, 5)).add(CellCoords::new(2, 2));
        assert_eq!(sel.corners().unwrap().as_tuple(), (2, 2, 5, 5));
        assert_eq!(sel.range().unwrap().highlight, CellCoords::new(5, 5));
        sel.clear();
        assert!(sel.corners().is_none());
    }

    #[test]
    fn clear_all_keeps_layers() {
        let mut all = Selections::new();
        let idx = all.push(Selection::new(SelectionStyle::area()));
        all.get_mut(idx).unwrap().add(CellCoords::new(1, 1));
        all.clear_all();
        assert_eq!(all.len(), 1);
        assert!(all.get(idx).unwrap().is_empty());
    }

    #[test]
    fn style_deserializes_camel_case() {
        let style: SelectionStyle = serde_json::from_str(
            r#"{"className":"area","highlightRowClass":"row","border":{"width":1}}"#,
        )
        .unwrap();
        assert_eq!(style.class_name.as_deref(), Some("area"));
        assert_eq!(style.highlight_row_class.as_deref(), Some("row"));
        let border = style.border.unwrap();
        assert!(border.corner_visible);
        assert!((border.width - 1.0).abs() < f32::EPSILON);
    }
}
