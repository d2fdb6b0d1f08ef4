//! ABI (Application Binary Interface) module for Solidity/EVM contracts
//!
//! This module provides the contract ABI codec:
//! - Type grammar with alias normalization (`uint` -> `uint256`, ...)
//! - Head/tail encoding and decoding of elementary types and arrays
//! - Fixed-point (`fixedNxM` / `ufixedNxM`) scaling
//! - Method selectors and event topics
//! - Signature-driven call encoding and return decoding
//! - Non-standard packed mode and its hashes

pub mod types;
pub mod value;
pub mod encoder;
pub mod decoder;
pub mod selector;
pub mod packed;


pub use types::*;
pub use value::{stringify, AbiValue};
pub use encoder::AbiEncoder;
pub use decoder::AbiDecoder;
pub use selector::{simple_decode, simple_encode, AbiSelector, Signature};
pub use packed::{solidity_pack, solidity_ripemd160, solidity_sha256, solidity_sha3};
