//! Inconsistency analysis over the merged slide content.

use crate::content::SlideContent;
use crate::error::Result;
use crate::model::LanguageModel;
use crate::prompt::AnalysisPrompt;

/// Ask the model for an inconsistency report covering every slide.
///
/// Exactly one request is made and the response is returned untouched.
pub fn find_inconsistencies(model: &dyn LanguageModel, content: &SlideContent) -> Result<String> {
    let prompt = AnalysisPrompt::new().build(content);
    log::info!(
        "Requesting inconsistency analysis for {} entries ({} chars)",
        content.len(),
        prompt.len()
    );

    model.generate(&prompt, None)
}
