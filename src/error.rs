//! Unified error types for the ABI codec
//!
//! Every failure in type parsing, encoding, decoding and selector
//! computation flows through [`AbiError`]. Errors carry an [`ErrorCode`]
//! so callers (and the CLI) can report them in a structured way.

use serde::{Deserialize, Serialize};

/// Errors raised by the codec
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AbiError {
    /// Type string does not match `ELEMENTARY ("[" INTEGER? "]")*`
    #[error("Invalid type syntax: {0}")]
    TypeSyntax(String),

    /// Width suffix is not a number or lies outside the legal range
    #[error("Invalid width for {type_name}: {reason}")]
    InvalidWidth { type_name: String, reason: String },

    /// Value does not fit the declared width
    #[error("Supplied {type_name} exceeds width: {width} vs {bits}")]
    WidthExceeded { type_name: String, width: usize, bits: usize },

    /// Type list and value list lengths differ
    #[error("Argument count mismatch: {types} types, {values} values")]
    ArgumentCount { types: usize, values: usize },

    /// Syntactically valid but unsupported type
    #[error("Unsupported or invalid type: {0}")]
    UnsupportedType(String),

    /// Fixed-point value not divisible by its scale
    #[error("Precision loss decoding {type_name}: value is not a multiple of 2^{scale}")]
    PrecisionLoss { type_name: String, scale: usize },

    /// Value has the wrong shape for its type or cannot be parsed
    #[error("Invalid value for type {type_name}: {reason}")]
    InvalidValue { type_name: String, reason: String },

    /// Fixed-size array given the wrong number of elements
    #[error("Array {type_name} expects {expected} elements, got {got}")]
    ArrayLength { type_name: String, expected: usize, got: usize },

    /// Read past the end of the buffer
    #[error("Buffer too short: need {needed} bytes at offset {offset}, have {available}")]
    OutOfBounds { offset: usize, needed: usize, available: usize },

    /// Malformed `name(types)` signature
    #[error("Invalid method signature: {0}")]
    InvalidSignature(String),
}

impl AbiError {
    pub(crate) fn invalid_value(type_name: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidValue { type_name: type_name.to_string(), reason: reason.into() }
    }

    pub(crate) fn invalid_width(type_name: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidWidth { type_name: type_name.to_string(), reason: reason.into() }
    }

    pub(crate) fn width_exceeded(type_name: impl ToString, width: usize, bits: usize) -> Self {
        Self::WidthExceeded { type_name: type_name.to_string(), width, bits }
    }

    /// Machine-readable category of this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AbiError::TypeSyntax(_) => ErrorCode::TypeSyntax,
            AbiError::InvalidWidth { .. } => ErrorCode::InvalidWidth,
            AbiError::WidthExceeded { .. } => ErrorCode::WidthExceeded,
            AbiError::ArgumentCount { .. } => ErrorCode::ArgumentCount,
            AbiError::UnsupportedType(_) => ErrorCode::UnsupportedType,
            AbiError::PrecisionLoss { .. } => ErrorCode::PrecisionLoss,
            AbiError::InvalidValue { .. } => ErrorCode::InvalidValue,
            AbiError::ArrayLength { .. } => ErrorCode::ArrayLength,
            AbiError::OutOfBounds { .. } => ErrorCode::OutOfBounds,
            AbiError::InvalidSignature(_) => ErrorCode::InvalidSignature,
        }
    }

    /// Serializable form for structured output
    pub fn report(&self) -> ErrorReport {
        ErrorReport { code: self.code(), message: self.to_string() }
    }
}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Grammar
    TypeSyntax,
    InvalidWidth,
    UnsupportedType,
    InvalidSignature,

    // Values
    WidthExceeded,
    ArgumentCount,
    ArrayLength,
    InvalidValue,
    PrecisionLoss,

    // Buffers
    OutOfBounds,
}

/// Error as reported to external callers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
}

/// Result type alias for codec operations
pub type AbiResult<T> = Result<T, AbiError>;
