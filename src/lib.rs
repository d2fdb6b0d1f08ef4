//! Hawala ABI Codec
//!
//! Ethereum contract ABI encoding and decoding.
//!
//! # Architecture
//!
//! This crate provides:
//! - **abi**: type grammar, head/tail codec, selectors, packed mode
//! - **serpent**: the legacy one-letter type dialect
//! - **error**: unified error type with machine-readable codes
//! - **utils**: hex helpers, structured logging, codec configuration
//!
//! The codec is stateless and synchronous. Hex conversion is left to the
//! caller; see [`utils::hex`].
//!
//! # Example
//!
//! ```rust,ignore
//! use hawala_abi::{encode, decode, method_id, AbiValue};
//!
//! let data = encode(&["uint256", "string"], &[AbiValue::uint(7), "hi".into()])?;
//! let values = decode(&["uint256", "string"], &data)?;
//! assert_eq!(method_id("transfer", &["address", "uint256"])?, [0xa9, 0x05, 0x9c, 0xbb]);
//! ```

pub mod error;
pub mod abi;
pub mod serpent;
pub mod utils;

// Re-export key types for convenience
pub use error::{AbiError, AbiResult, ErrorCode, ErrorReport};
pub use abi::{
    parse_types, simple_decode, simple_encode, solidity_pack, solidity_ripemd160, solidity_sha256,
    solidity_sha3, stringify, AbiDecoder, AbiEncoder, AbiSelector, AbiType, AbiValue, ArraySize,
    Signature,
};
pub use serpent::{from_serpent, to_serpent};
pub use utils::{CodecConfig, HexFormat};

/// Encode `values` against type strings such as `["address", "uint"]`
pub fn encode(types: &[&str], values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    AbiEncoder::encode(&parse_types(types)?, values)
}

/// Decode `data` against type strings
pub fn decode(types: &[&str], data: &[u8]) -> AbiResult<Vec<AbiValue>> {
    AbiDecoder::decode(&parse_types(types)?, data)
}

/// 4-byte function selector of `name(types)`
pub fn method_id(name: &str, types: &[&str]) -> AbiResult<[u8; 4]> {
    AbiSelector::method_id(name, types)
}

/// 32-byte event topic of `name(types)`
pub fn event_id(name: &str, types: &[&str]) -> AbiResult<[u8; 32]> {
    AbiSelector::event_id(name, types)
}
