//! Image description: one model call per slide image.

use crate::content::SlideContent;
use crate::error::Result;
use crate::model::LanguageModel;
use crate::prompt::IMAGE_DESCRIPTION_PROMPT;
use crate::slide_image::SlideImage;
use std::path::{Path, PathBuf};

/// Label for an image: its file name up to the first '.'.
///
/// `slide.10.jpeg` becomes `slide`, so names that differ only after the
/// first dot collapse onto the same label.
pub fn image_label(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name.to_string(),
    }
}

/// Describe each image in order, stopping at the first failure.
pub fn describe_images(model: &dyn LanguageModel, paths: &[PathBuf]) -> Result<SlideContent> {
    let mut descriptions = SlideContent::new();

    for (idx, path) in paths.iter().enumerate() {
        log::info!("Describing image {}/{}: {}", idx + 1, paths.len(), path.display());

        let image = SlideImage::load(path)?;
        let description = model.generate(IMAGE_DESCRIPTION_PROMPT, Some(&image))?;

        let label = image_label(path);
        if descriptions.insert(label.as_str(), description).is_some() {
            log::warn!(
                "Image label '{}' seen more than once; keeping the description of {}",
                label,
                path.display()
            );
        }
    }

    Ok(descriptions)
}
