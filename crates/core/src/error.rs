//! Error types for presentation auditing.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting and analyzing a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing or invalid configuration (e.g. no API key).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// The PPTX package is structurally invalid.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// A slide image could not be loaded.
    #[error("Image error: {0}")]
    ImageError(String),

    /// The language-model service call failed.
    #[error("Model request failed: {0}")]
    RemoteError(String),
}
