//! Domain types for representing extracted presentation content.

use serde::{Deserialize, Serialize};

/// Represents an entire presentation with its extracted shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    /// Original filename (without path).
    pub filename: String,

    /// Slides in presentation order.
    pub slides: Vec<ExtractedSlide>,
}

impl Presentation {
    /// Create a new, empty presentation with the given filename.
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            slides: Vec::new(),
        }
    }

    /// Add a slide to the presentation.
    pub fn add_slide(&mut self, slide: ExtractedSlide) {
        self.slides.push(slide);
    }
}

/// A single extracted slide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Top-level shapes in the order they are stored on the slide.
    pub shapes: Vec<Shape>,
}

impl ExtractedSlide {
    /// Create a new slide with the given number.
    pub fn new(number: usize) -> Self {
        Self {
            number,
            shapes: Vec::new(),
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Label used for this slide in the content mapping, e.g. "Slide 3".
    pub fn label(&self) -> String {
        format!("Slide {}", self.number)
    }
}

/// A content element on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// A shape with a text frame. The text may be empty.
    Text(String),

    /// A graphic frame holding a table.
    Table(Table),

    /// Pictures, connectors, groups, charts and anything else without text.
    Other,
}

/// Table contents as a grid of cell strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in document order, each a list of cell texts.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from rows of cell text.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}
