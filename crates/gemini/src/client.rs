//! Blocking client for the Gemini `generateContent` endpoint.

use crate::config::GeminiConfig;
use crate::wire::{
    Blob, ErrorEnvelope, GenerateContentRequest, GenerateContentResponse, RequestContent,
    RequestPart,
};
use base64::Engine;
use deck_core::{Error, LanguageModel, Result, SlideImage};
use reqwest::blocking::Client;
use reqwest::StatusCode;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini model client. One HTTP request per [`LanguageModel::generate`] call.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    http: Client,
}

impl GeminiClient {
    /// Create a client using the HTTP library's default timeouts.
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

impl LanguageModel for GeminiClient {
    fn generate(&self, prompt: &str, image: Option<&SlideImage>) -> Result<String> {
        let url = self.endpoint();
        let body = build_request(prompt, image);

        log::debug!(
            "POST {} ({} prompt chars, image: {})",
            url,
            prompt.len(),
            image.map(|i| i.path.display().to_string()).unwrap_or_else(|| "none".to_string())
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::RemoteError(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| Error::RemoteError(format!("Failed to read response body: {}", e)))?;

        parse_response(status, &text)
    }
}

/// Build a single-turn user request with the prompt and an optional image.
fn build_request(prompt: &str, image: Option<&SlideImage>) -> GenerateContentRequest {
    let mut parts = vec![RequestPart::Text {
        text: prompt.to_string(),
    }];

    if let Some(image) = image {
        parts.push(RequestPart::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.clone(),
                data: base64::engine::general_purpose::STANDARD.encode(&image.data),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![RequestContent {
            role: "user".to_string(),
            parts,
        }],
    }
}

/// Turn an HTTP status and body into the model's text, or an error.
///
/// The text is every non-thought part of the first candidate, concatenated.
fn parse_response(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .and_then(|envelope| match (envelope.error.status, envelope.error.message) {
                (Some(code), Some(message)) => Some(format!("{}: {}", code, message)),
                (None, Some(message)) => Some(message),
                (Some(code), None) => Some(code),
                (None, None) => None,
            })
            .unwrap_or_else(|| body.trim().to_string());

        return Err(Error::RemoteError(format!("HTTP {}: {}", status, detail)));
    }

    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::RemoteError(format!("Malformed response: {}", e)))?;

    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no reason given".to_string());
            return Err(Error::RemoteError(format!(
                "Response contained no candidates ({})",
                reason
            )));
        }
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| !part.thought)
        .filter_map(|part| part.text)
        .collect();

    if texts.is_empty() {
        return Err(Error::RemoteError(format!(
            "Candidate contained no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(texts.concat())
}
