//! Gemini API backend for presentation auditing.
//!
//! Implements [`deck_core::LanguageModel`] on top of the `generateContent`
//! REST endpoint using a blocking HTTP client.

pub mod client;
pub mod config;
mod wire;

pub use client::GeminiClient;
pub use config::GeminiConfig;
