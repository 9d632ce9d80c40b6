//! Core domain types, slide flattening, and model-driven inconsistency
//! analysis for presentation auditing.

pub mod analyze;
pub mod content;
pub mod describe;
pub mod error;
pub mod flatten;
pub mod model;
pub mod prompt;
pub mod slide_image;
pub mod types;

pub use analyze::find_inconsistencies;
pub use content::{merge_content, SlideContent};
pub use describe::{describe_images, image_label};
pub use error::{Error, Result};
pub use flatten::{serialize_table, SlideFlattener};
pub use model::LanguageModel;
pub use prompt::{AnalysisPrompt, IMAGE_DESCRIPTION_PROMPT};
pub use slide_image::SlideImage;
pub use types::{ExtractedSlide, Presentation, Shape, Table};
