//! Error types for layout and import.
//!
//! The layout components themselves are total functions. Errors only come
//! from the orchestrator's eager time-signature check and from the
//! MusicXML / JSON surfaces that feed it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Numerator is zero, or denominator is not a power of two in 1..=256.
    #[error("invalid time signature {numerator}/{denominator}")]
    InvalidTimeSignature { numerator: u32, denominator: u32 },

    /// XML is malformed
    #[error("XML parse error: {0}")]
    Xml(String),

    /// Well-formed XML that is not a document we can import
    #[error("unsupported MusicXML document: {0}")]
    UnsupportedFormat(String),

    /// Compressed .mxl archive could not be read
    #[error("MXL archive error: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(String),

    /// Config input or geometry output failed to (de)serialize
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for LayoutError {
    fn from(e: serde_json::Error) -> Self {
        LayoutError::Json(e.to_string())
    }
}
