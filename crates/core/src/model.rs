//! Seam between the pipeline and the generative-language service.

use crate::error::Result;
use crate::slide_image::SlideImage;

/// A text-generation backend that accepts a prompt and an optional image.
///
/// Responses are free text with no guaranteed structure.
pub trait LanguageModel {
    /// Submit one request and return the model's text response.
    fn generate(&self, prompt: &str, image: Option<&SlideImage>) -> Result<String>;
}
