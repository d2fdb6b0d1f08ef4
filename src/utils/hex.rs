//! Hex conversion for byte buffers exchanged with callers
//!
//! The codec itself works on raw bytes; whether a `0x` prefix is used on the
//! way out is the caller's choice.

use std::fmt;
use std::str::FromStr;

use crate::error::{AbiError, AbiResult};

/// Output convention for hex strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HexFormat {
    /// `0xdeadbeef`
    #[default]
    Prefixed,
    /// `deadbeef`
    Bare,
}

impl HexFormat {
    /// Encode bytes as lowercase hex using this convention
    pub fn encode(&self, bytes: impl AsRef<[u8]>) -> String {
        match self {
            HexFormat::Prefixed => format!("0x{}", hex::encode(bytes)),
            HexFormat::Bare => hex::encode(bytes),
        }
    }
}

impl FromStr for HexFormat {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "prefixed" => Ok(HexFormat::Prefixed),
            "0" | "false" | "no" | "bare" => Ok(HexFormat::Bare),
            other => Err(AbiError::invalid_value("hex prefix setting", format!("unknown value '{}'", other))),
        }
    }
}

impl fmt::Display for HexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexFormat::Prefixed => write!(f, "prefixed"),
            HexFormat::Bare => write!(f, "bare"),
        }
    }
}

/// Decode a hex string with or without `0x` prefix
pub fn decode_hex(s: &str) -> AbiResult<Vec<u8>> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| AbiError::invalid_value("hex", e.to_string()))
}
