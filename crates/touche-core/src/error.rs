//! # Error Types
//!
//! Errors raised while parsing the core vocabulary from text and while
//! validating match descriptors handed over by the QR collaborator.

use thiserror::Error;

/// Failure to parse a side or format name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The text does not name a match format.
    #[error("unknown match format {0:?} (expected pool, elimination, team or freeform)")]
    UnknownFormat(String),

    /// The text does not name a side.
    #[error("unknown side {0:?} (expected left or right)")]
    UnknownSide(String),
}

/// A decoded QR payload that cannot be used as a match descriptor.
///
/// Both variants are recoverable: the scanning session stays open so the
/// operator can present another code.
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// The payload is not JSON, or a field has the wrong JSON type.
    #[error("invalid QR code data: {0}")]
    InvalidData(#[from] serde_json::Error),

    /// A required field is absent or empty.
    #[error("invalid QR code format: missing {field}")]
    MissingField {
        /// Wire name of the missing field.
        field: &'static str,
    },
}
