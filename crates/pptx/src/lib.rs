//! PPTX (Office Open XML) reader for presentation auditing.
//!
//! Parses .pptx files which are ZIP archives containing XML documents, and
//! returns each slide's top-level shapes with their text or table contents.

pub mod parser;

pub use parser::PptxParser;
