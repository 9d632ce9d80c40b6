//! Flattening of slide shapes into a single text blob per slide.
//!
//! Text shapes contribute their text verbatim, tables are serialized into a
//! single line, and everything else is dropped.

use crate::content::SlideContent;
use crate::types::{ExtractedSlide, Presentation, Shape, Table};

/// Label prepended to serialized table contents.
pub const TABLE_PREFIX: &str = "Table content: ";

/// Separator between cells of a table row.
const CELL_SEPARATOR: &str = ", ";

/// Separator between table rows.
const ROW_SEPARATOR: &str = "; ";

/// Serialize a table as `Table content: a, b; c, d`.
pub fn serialize_table(table: &Table) -> String {
    let rows: Vec<String> = table
        .rows
        .iter()
        .map(|row| row.join(CELL_SEPARATOR))
        .collect();

    format!("{}{}", TABLE_PREFIX, rows.join(ROW_SEPARATOR))
}

/// Turns extracted slides into the label → text mapping used for analysis.
#[derive(Debug, Clone, Default)]
pub struct SlideFlattener;

impl SlideFlattener {
    pub fn new() -> Self {
        Self
    }

    /// Flatten one slide's shapes into a single string.
    ///
    /// Fragments are joined with single spaces and the result is trimmed.
    /// Empty text shapes still count as fragments, so they can leave a
    /// double space in the middle of the output.
    pub fn flatten_slide(&self, slide: &ExtractedSlide) -> String {
        let fragments: Vec<String> = slide
            .shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Text(text) => Some(text.clone()),
                Shape::Table(table) => Some(serialize_table(table)),
                Shape::Other => None,
            })
            .collect();

        fragments.join(" ").trim().to_string()
    }

    /// Flatten every slide, keyed "Slide N" in presentation order.
    pub fn flatten_presentation(&self, presentation: &Presentation) -> SlideContent {
        let mut content = SlideContent::new();

        for slide in &presentation.slides {
            let text = self.flatten_slide(slide);
            log::debug!(
                "Slide {}: {} shapes, {} chars",
                slide.number,
                slide.shapes.len(),
                text.len()
            );
            content.insert(slide.label(), text);
        }

        content
    }
}
