//! Utilities Module
//!
//! Common utilities used across the crate.

pub mod codec_config;
pub mod hex;
pub mod logging;

pub use codec_config::CodecConfig;
pub use self::hex::{decode_hex, HexFormat};
