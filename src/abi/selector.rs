//! Function selector and event topic calculation
//!
//! Also covers signature-driven calls: `transfer(address,uint256)` for
//! encoding arguments and `balanceOf(address):(uint256)` for decoding
//! return values.

use sha3::{Digest, Keccak256};

use super::decoder::AbiDecoder;
use super::encoder::AbiEncoder;
use super::types::*;
use super::value::AbiValue;
use crate::error::{AbiError, AbiResult};
use crate::log_debug;

/// ABI selector calculator
pub struct AbiSelector;

impl AbiSelector {
    /// Canonical signature `name(t1,t2,...)` with aliases expanded
    pub fn signature<S: AsRef<str>>(name: &str, types: &[S]) -> AbiResult<String> {
        let types = parse_types(types)?;
        Ok(canonical_signature(name, &types))
    }

    /// 4-byte method selector: first 4 bytes of keccak256(signature)
    pub fn method_id<S: AsRef<str>>(name: &str, types: &[S]) -> AbiResult<[u8; 4]> {
        let signature = Self::signature(name, types)?;
        let selector = Self::selector_from_signature(&signature);
        log_debug!(
            "abi::selector",
            "computed method id",
            signature = signature,
            selector = hex::encode(selector),
        );
        Ok(selector)
    }

    /// 32-byte event topic: keccak256(signature)
    pub fn event_id<S: AsRef<str>>(name: &str, types: &[S]) -> AbiResult<[u8; 32]> {
        let signature = Self::signature(name, types)?;
        Ok(Self::topic_from_signature(&signature))
    }

    /// Selector of an already-canonical signature string
    pub fn selector_from_signature(signature: &str) -> [u8; 4] {
        let hash = Self::keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    /// Topic of an already-canonical signature string
    pub fn topic_from_signature(signature: &str) -> [u8; 32] {
        Self::keccak256(signature.as_bytes())
    }

    /// Calculate keccak256 hash
    pub fn keccak256(data: &[u8]) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

fn canonical_signature(name: &str, types: &[AbiType]) -> String {
    let params = types.iter().map(|t| t.canonical_type()).collect::<Vec<_>>().join(",");
    format!("{}({})", name, params)
}

/// A parsed method signature: `name(inputs)` or `name(inputs):(outputs)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub inputs: Vec<AbiType>,
    pub outputs: Option<Vec<AbiType>>,
}

impl Signature {
    pub fn parse(signature: &str) -> AbiResult<Self> {
        let invalid = || AbiError::InvalidSignature(signature.to_string());

        let open = signature.find('(').ok_or_else(invalid)?;
        let name = &signature[..open];
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(invalid());
        }

        let body = signature[open + 1..].strip_suffix(')').ok_or_else(invalid)?;
        let (inputs, outputs) = match body.split_once("):(") {
            Some((inputs, outputs)) => (inputs, Some(outputs)),
            None => (body, None),
        };

        Ok(Self {
            name: name.to_string(),
            inputs: parse_list(inputs)?,
            outputs: outputs.map(parse_list).transpose()?,
        })
    }

    /// Canonical `name(inputs)` used for the selector
    pub fn canonical(&self) -> String {
        canonical_signature(&self.name, &self.inputs)
    }

    pub fn selector(&self) -> [u8; 4] {
        AbiSelector::selector_from_signature(&self.canonical())
    }
}

fn parse_list(list: &str) -> AbiResult<Vec<AbiType>> {
    if list.trim().is_empty() {
        return Ok(vec![]);
    }
    list.split(',').map(|t| AbiType::parse(t.trim())).collect()
}

/// Encode a call from its signature: selector followed by the arguments
pub fn simple_encode(signature: &str, values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    let sig = Signature::parse(signature)?;
    if sig.inputs.len() != values.len() {
        return Err(AbiError::ArgumentCount { types: sig.inputs.len(), values: values.len() });
    }

    let params = AbiEncoder::encode(&sig.inputs, values)?;
    let mut result = Vec::with_capacity(4 + params.len());
    result.extend_from_slice(&sig.selector());
    result.extend_from_slice(&params);
    Ok(result)
}

/// Decode return data using the `:(outputs)` part of a signature
pub fn simple_decode(signature: &str, data: &[u8]) -> AbiResult<Vec<AbiValue>> {
    let sig = Signature::parse(signature)?;
    let outputs = sig.outputs.ok_or_else(|| {
        AbiError::InvalidSignature(format!("{}: no return values in method", signature))
    })?;
    AbiDecoder::decode(&outputs, data)
}
