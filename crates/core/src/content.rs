//! Ordered mapping from slide labels to text.

use serde::{Deserialize, Serialize};

/// Mapping from a slide label ("Slide 1", or an image name) to its text.
///
/// Iteration follows first-insertion order. Re-inserting an existing label
/// replaces its text but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideContent {
    entries: Vec<(String, String)>,
}

impl SlideContent {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the text for `label`.
    ///
    /// Returns the previous text if the label was already present.
    pub fn insert(&mut self, label: impl Into<String>, text: impl Into<String>) -> Option<String> {
        let label = label.into();
        let text = text.into();

        match self.entries.iter_mut().find(|(l, _)| *l == label) {
            Some((_, existing)) => Some(std::mem::replace(existing, text)),
            None => {
                self.entries.push((label, text));
                None
            }
        }
    }

    /// Get the text stored for `label`.
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, t)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(label, text)` pairs in mapping order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    /// Labels in mapping order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }
}

impl<L: Into<String>, T: Into<String>> FromIterator<(L, T)> for SlideContent {
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut content = SlideContent::new();
        for (label, text) in iter {
            content.insert(label, text);
        }
        content
    }
}

/// Merge document-derived and image-derived content.
///
/// Starts from `document` and overlays every entry of `images`. On a label
/// collision the image description replaces the document text in place.
pub fn merge_content(document: SlideContent, images: SlideContent) -> SlideContent {
    let mut merged = document;
    for (label, text) in images.entries {
        if merged.insert(label.as_str(), text).is_some() {
            log::debug!("Image description replaces document text for '{}'", label);
        }
    }
    merged
}
