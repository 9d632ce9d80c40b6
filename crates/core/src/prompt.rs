//! Prompt text sent to the language model.
//!
//! The analysis prompt is a fixed set of instructions followed by every
//! entry of the content mapping rendered as a labelled block.

use crate::content::SlideContent;

/// Instruction sent alongside every slide image.
pub const IMAGE_DESCRIPTION_PROMPT: &str =
    "Describe all text, charts, and key data points on this slide image.";

/// Task description that opens the analysis prompt.
const ANALYSIS_INSTRUCTIONS: &str = "Analyze the following presentation for any factual or logical inconsistencies. \
Look for conflicting numbers, contradictory claims, and timeline mismatches. \
Provide a clear, structured output, referencing slide numbers and explaining the nature of each issue. \
If no inconsistencies are found, state that clearly.\n\n";

/// Header introducing the slide blocks.
const CONTENT_PREAMBLE: &str =
    "Here is the content from a multi-slide PowerPoint presentation:\n\n";

/// Builder for the single inconsistency-analysis prompt.
#[derive(Debug, Clone, Default)]
pub struct AnalysisPrompt;

impl AnalysisPrompt {
    pub fn new() -> Self {
        Self
    }

    /// Render one slide as `--- {label} ---\n{content}\n\n`.
    pub fn render_block(&self, label: &str, content: &str) -> String {
        format!("--- {} ---\n{}\n\n", label, content)
    }

    /// Render every entry, in mapping order, under the content preamble.
    pub fn render_content(&self, content: &SlideContent) -> String {
        let mut combined = String::from(CONTENT_PREAMBLE);
        for (label, text) in content.iter() {
            combined.push_str(&self.render_block(label, text));
        }
        combined
    }

    /// Build the full analysis prompt.
    ///
    /// # Example output
    /// ```text
    /// Analyze the following presentation for any factual or logical inconsistencies. ...
    ///
    /// Presentation Content:
    /// Here is the content from a multi-slide PowerPoint presentation:
    ///
    /// --- Slide 1 ---
    /// Revenue was $10M in Q1
    ///
    /// ```
    pub fn build(&self, content: &SlideContent) -> String {
        format!(
            "{}Presentation Content:\n{}",
            ANALYSIS_INSTRUCTIONS,
            self.render_content(content)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_block() {
        let prompt = AnalysisPrompt::new();
        assert_eq!(
            prompt.render_block("Slide 1", "Revenue: $5M"),
            "--- Slide 1 ---\nRevenue: $5M\n\n"
        );
    }

    #[test]
    fn test_render_content_keeps_mapping_order() {
        let content: SlideContent = [("Slide 2", "second"), ("Slide 1", "first")]
            .into_iter()
            .collect();

        let rendered = AnalysisPrompt::new().render_content(&content);

        assert_eq!(
            rendered,
            "Here is the content from a multi-slide PowerPoint presentation:\n\n\
             --- Slide 2 ---\nsecond\n\n\
             --- Slide 1 ---\nfirst\n\n"
        );
    }

    #[test]
    fn test_build_starts_with_instructions() {
        let content: SlideContent = [("Slide 1", "x")].into_iter().collect();
        let prompt = AnalysisPrompt::new().build(&content);

        assert!(prompt.starts_with("Analyze the following presentation"));
        assert!(prompt.contains("conflicting numbers, contradictory claims, and timeline mismatches"));
        assert!(prompt.contains("If no inconsistencies are found, state that clearly."));
        assert!(prompt.contains("Presentation Content:\nHere is the content"));
        assert!(prompt.ends_with("--- Slide 1 ---\nx\n\n"));
    }

    #[test]
    fn test_build_with_empty_content() {
        let prompt = AnalysisPrompt::new().build(&SlideContent::new());
        assert!(prompt.ends_with(CONTENT_PREAMBLE));
    }
}
