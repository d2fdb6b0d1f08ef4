//! ABI values - runtime representation of Solidity values
//!
//! Callers supply values loosely (numbers as decimal or `0x` strings,
//! addresses as hex or integers) and the codec coerces them against the
//! declared [`AbiType`]. Decoding always produces the canonical variant.

use std::borrow::Cow;

use ethers_core::types::{Address, I256, U256, U512};

use super::types::AbiType;
use crate::error::{AbiError, AbiResult};

/// ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbiValue {
    /// `uintN` and `ufixedNxM`
    Uint(U256),
    /// `intN` and `fixedNxM`
    Int(I256),
    Address(Address),
    Bool(bool),
    /// `bytesN`
    FixedBytes(Vec<u8>),
    Bytes(Vec<u8>),
    /// A `string` value, or a textual number/address/hex payload
    String(String),
    /// Fixed or dynamic array
    Array(Vec<AbiValue>),
}

/// Sign and magnitude of a numeric argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Number {
    pub negative: bool,
    pub magnitude: U256,
}

impl Number {
    pub fn unsigned(magnitude: U256) -> Self {
        Self { negative: false, magnitude }
    }

    pub fn signed(value: I256) -> Self {
        Self { negative: value.is_negative(), magnitude: value.unsigned_abs() }
    }

    /// Bit length of the magnitude
    pub fn bit_length(&self) -> usize {
        self.magnitude.bits()
    }

    /// Parse a decimal or `0x`-hex string with an optional leading `-`
    pub fn parse(text: &str, abi_type: &AbiType) -> AbiResult<Self> {
        let trimmed = text.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (digits, radix) = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            Some(hex) => (hex, 16),
            None => (digits, 10),
        };

        let valid = match radix {
            16 => digits.bytes().all(|b| b.is_ascii_hexdigit()),
            _ => digits.bytes().all(|b| b.is_ascii_digit()),
        };
        if digits.is_empty() || !valid {
            return Err(AbiError::invalid_value(abi_type, format!("'{}' is not a number", text)));
        }

        // Parse wide so oversized inputs report their real bit length
        let wide = U512::from_str_radix(digits, radix)
            .map_err(|_| AbiError::width_exceeded(abi_type, 256, 513))?;
        if wide.bits() > 256 {
            return Err(AbiError::width_exceeded(abi_type, 256, wide.bits()));
        }
        let mut buf = [0u8; 64];
        wide.to_big_endian(&mut buf);
        let magnitude = U256::from_big_endian(&buf[32..]);

        Ok(Self { negative: negative && !magnitude.is_zero(), magnitude })
    }

    /// Two's-complement signed value, if it fits in 256 bits
    pub fn to_i256(&self) -> Option<I256> {
        let limit = U256::one() << 255;
        if self.negative {
            if self.magnitude > limit {
                return None;
            }
            let (raw, _) = (!self.magnitude).overflowing_add(U256::one());
            Some(I256::from_raw(raw))
        } else {
            if self.magnitude >= limit {
                return None;
            }
            Some(I256::from_raw(self.magnitude))
        }
    }
}

impl AbiValue {
    /// Create a Uint value from a u64
    pub fn uint(value: u64) -> Self {
        AbiValue::Uint(U256::from(value))
    }

    /// Create an Int value from an i64
    pub fn int(value: i64) -> Self {
        let number = Number { negative: value < 0, magnitude: U256::from(value.unsigned_abs()) };
        // |i64| always fits in 256-bit two's complement
        AbiValue::Int(number.to_i256().unwrap_or_default())
    }

    /// Create an Address value from a hex string (with or without 0x)
    pub fn address_from_str(s: &str) -> AbiResult<Self> {
        let bytes = crate::utils::hex::decode_hex(s)
            .map_err(|_| AbiError::invalid_value("address", "invalid hex"))?;
        if bytes.len() != 20 {
            return Err(AbiError::invalid_value("address", "address must be 20 bytes"));
        }
        Ok(AbiValue::Address(Address::from_slice(&bytes)))
    }

    /// Create a Bytes value from a hex string
    pub fn bytes_from_hex(s: &str) -> AbiResult<Self> {
        let bytes = crate::utils::hex::decode_hex(s)
            .map_err(|_| AbiError::invalid_value("bytes", "invalid hex"))?;
        Ok(AbiValue::Bytes(bytes))
    }

    /// Convert a JSON value as supplied on the command line or over FFI
    pub fn from_json(value: &serde_json::Value) -> AbiResult<Self> {
        use serde_json::Value;

        match value {
            Value::Bool(b) => Ok(AbiValue::Bool(*b)),
            Value::String(s) => Ok(AbiValue::String(s.clone())),
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    Ok(AbiValue::uint(u))
                } else if let Some(i) = n.as_i64() {
                    Ok(AbiValue::int(i))
                } else {
                    Err(AbiError::invalid_value("number", format!("{} is not an integer", n)))
                }
            }
            Value::Array(items) => {
                items.iter().map(Self::from_json).collect::<AbiResult<Vec<_>>>().map(AbiValue::Array)
            }
            other => Err(AbiError::invalid_value("json", format!("unsupported value {}", other))),
        }
    }

    /// Render as JSON: arrays stay arrays, scalars become strings
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            AbiValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(|v| v.to_json()).collect())
            }
            AbiValue::Bool(b) => serde_json::Value::Bool(*b),
            other => serde_json::Value::String(other.stringify()),
        }
    }

    /// Human-readable rendering: hex for addresses and bytes, decimal for
    /// numbers, array items joined with ", "
    pub fn stringify(&self) -> String {
        match self {
            AbiValue::Uint(v) => v.to_string(),
            AbiValue::Int(v) => v.to_string(),
            AbiValue::Address(a) => format!("0x{}", hex::encode(a.as_bytes())),
            AbiValue::Bool(b) => b.to_string(),
            AbiValue::FixedBytes(b) | AbiValue::Bytes(b) => format!("0x{}", hex::encode(b)),
            AbiValue::String(s) => s.clone(),
            AbiValue::Array(items) => items.iter().map(|v| v.stringify()).collect::<Vec<_>>().join(", "),
        }
    }

    pub(crate) fn as_number(&self, abi_type: &AbiType) -> AbiResult<Number> {
        match self {
            AbiValue::Uint(v) => Ok(Number::unsigned(*v)),
            AbiValue::Int(v) => Ok(Number::signed(*v)),
            AbiValue::String(s) => Number::parse(s, abi_type),
            _ => Err(self.mismatch(abi_type)),
        }
    }

    pub(crate) fn as_bool(&self, abi_type: &AbiType) -> AbiResult<bool> {
        match self {
            AbiValue::Bool(b) => Ok(*b),
            _ => Err(self.mismatch(abi_type)),
        }
    }

    /// Addresses are stored as `uint160`, so numeric inputs are accepted too
    pub(crate) fn as_address(&self, abi_type: &AbiType) -> AbiResult<Address> {
        let number = match self {
            AbiValue::Address(a) => return Ok(*a),
            AbiValue::String(s) => {
                let bare = s.trim();
                if bare.len() == 40 && bare.bytes().all(|b| b.is_ascii_hexdigit()) {
                    Number::parse(&format!("0x{}", bare), abi_type)?
                } else {
                    Number::parse(bare, abi_type)?
                }
            }
            AbiValue::Uint(_) | AbiValue::Int(_) => self.as_number(abi_type)?,
            _ => return Err(self.mismatch(abi_type)),
        };

        if number.negative || number.bit_length() > 160 {
            return Err(AbiError::width_exceeded(abi_type, 160, number.bit_length()));
        }
        let mut word = [0u8; 32];
        number.magnitude.to_big_endian(&mut word);
        Ok(Address::from_slice(&word[12..]))
    }

    /// Raw bytes for `bytes` / `bytesN`. Strings must be `0x` hex unless
    /// `utf8_fallback` is set, in which case they are taken as UTF-8.
    pub(crate) fn as_bytes(&self, abi_type: &AbiType, utf8_fallback: bool) -> AbiResult<Cow<'_, [u8]>> {
        match self {
            AbiValue::Bytes(b) | AbiValue::FixedBytes(b) => Ok(Cow::Borrowed(b)),
            AbiValue::String(s) => {
                if s.starts_with("0x") || s.starts_with("0X") {
                    crate::utils::hex::decode_hex(s)
                        .map(Cow::Owned)
                        .map_err(|_| AbiError::invalid_value(abi_type, format!("'{}' is not valid hex", s)))
                } else if utf8_fallback {
                    Ok(Cow::Borrowed(s.as_bytes()))
                } else {
                    Err(AbiError::invalid_value(abi_type, format!("'{}' is not 0x-prefixed hex", s)))
                }
            }
            _ => Err(self.mismatch(abi_type)),
        }
    }

    pub(crate) fn as_str(&self, abi_type: &AbiType) -> AbiResult<&str> {
        match self {
            AbiValue::String(s) => Ok(s),
            _ => Err(self.mismatch(abi_type)),
        }
    }

    pub(crate) fn as_array(&self, abi_type: &AbiType) -> AbiResult<&[AbiValue]> {
        match self {
            AbiValue::Array(items) => Ok(items),
            _ => Err(self.mismatch(abi_type)),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AbiValue::Uint(_) => "uint",
            AbiValue::Int(_) => "int",
            AbiValue::Address(_) => "address",
            AbiValue::Bool(_) => "bool",
            AbiValue::FixedBytes(_) => "fixed bytes",
            AbiValue::Bytes(_) => "bytes",
            AbiValue::String(_) => "string",
            AbiValue::Array(_) => "array",
        }
    }

    fn mismatch(&self, abi_type: &AbiType) -> AbiError {
        AbiError::invalid_value(abi_type, format!("cannot encode {} value", self.kind()))
    }
}

/// Stringify a list of values, e.g. for display of decoded results
pub fn stringify(values: &[AbiValue]) -> Vec<String> {
    values.iter().map(|v| v.stringify()).collect()
}

impl From<u64> for AbiValue {
    fn from(value: u64) -> Self {
        AbiValue::uint(value)
    }
}

impl From<i64> for AbiValue {
    fn from(value: i64) -> Self {
        AbiValue::int(value)
    }
}

impl From<bool> for AbiValue {
    fn from(value: bool) -> Self {
        AbiValue::Bool(value)
    }
}

impl From<&str> for AbiValue {
    fn from(value: &str) -> Self {
        AbiValue::String(value.to_string())
    }
}

impl From<String> for AbiValue {
    fn from(value: String) -> Self {
        AbiValue::String(value)
    }
}

impl From<U256> for AbiValue {
    fn from(value: U256) -> Self {
        AbiValue::Uint(value)
    }
}

impl From<I256> for AbiValue {
    fn from(value: I256) -> Self {
        AbiValue::Int(value)
    }
}

impl From<Address> for AbiValue {
    fn from(value: Address) -> Self {
        AbiValue::Address(value)
    }
}

impl<T: Into<AbiValue>> From<Vec<T>> for AbiValue {
    fn from(values: Vec<T>) -> Self {
        AbiValue::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint256() -> AbiType {
        AbiType::Uint(256)
    }

    #[test]
    fn test_parse_decimal_and_hex() {
        let dec = Number::parse("255", &uint256()).unwrap();
        assert_eq!(dec.magnitude, U256::from(255));
        assert!(!dec.negative);

        let hex = Number::parse("0xff", &uint256()).unwrap();
        assert_eq!(hex.magnitude, U256::from(255));

        let neg = Number::parse("-1", &uint256()).unwrap();
        assert!(neg.negative);
        assert_eq!(neg.bit_length(), 1);

        // negative zero is plain zero
        assert!(!Number::parse("-0", &uint256()).unwrap().negative);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Number::parse("12a", &uint256()), Err(AbiError::InvalidValue { .. })));
        assert!(matches!(Number::parse("", &uint256()), Err(AbiError::InvalidValue { .. })));
        assert!(matches!(Number::parse("0x", &uint256()), Err(AbiError::InvalidValue { .. })));
        assert!(matches!(Number::parse("1.5", &uint256()), Err(AbiError::InvalidValue { .. })));
    }

    #[test]
    fn test_parse_oversized() {
        let too_big = format!("0x1{}", "0".repeat(64));
        match Number::parse(&too_big, &uint256()) {
            Err(AbiError::WidthExceeded { width, bits, .. }) => {
                assert_eq!(width, 256);
                assert_eq!(bits, 257);
            }
            other => panic!("expected WidthExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_to_i256_bounds() {
        let min = Number { negative: true, magnitude: U256::one() << 255 };
        assert_eq!(min.to_i256(), Some(I256::MIN));

        let over = Number { negative: false, magnitude: U256::one() << 255 };
        assert_eq!(over.to_i256(), None);

        let minus_one = Number { negative: true, magnitude: U256::one() };
        assert_eq!(minus_one.to_i256(), Some(I256::minus_one()));
        assert_eq!(minus_one.to_i256().unwrap().into_raw(), U256::MAX);
    }

    #[test]
    fn test_abi_value_address() {
        let addr = AbiValue::address_from_str("0x1234567890123456789012345678901234567890").unwrap();
        if let AbiValue::Address(a) = addr {
            assert_eq!(a.as_bytes()[0], 0x12);
            assert_eq!(a.as_bytes()[19], 0x90);
        } else {
            panic!("Expected Address");
        }
        assert!(AbiValue::address_from_str("0x1234").is_err());
    }

    #[test]
    fn test_address_coercion() {
        let ty = AbiType::Address;
        let from_uint = AbiValue::uint(0xdead).as_address(&ty).unwrap();
        assert_eq!(&from_uint.as_bytes()[18..], &[0xde, 0xad]);

        let bare = AbiValue::from("00000000000000000000000000000000000000ff").as_address(&ty).unwrap();
        assert_eq!(bare.as_bytes()[19], 0xff);

        let too_wide = AbiValue::Uint(U256::one() << 160).as_address(&ty);
        assert!(matches!(too_wide, Err(AbiError::WidthExceeded { width: 160, bits: 161, .. })));
    }

    #[test]
    fn test_stringify() {
        let values = vec![
            AbiValue::uint(42),
            AbiValue::int(-7),
            AbiValue::Bool(true),
            AbiValue::Bytes(vec![0xde, 0xad]),
            AbiValue::String("hi".to_string()),
            AbiValue::from(vec![1u64, 2, 3]),
        ];
        assert_eq!(stringify(&values), vec!["42", "-7", "true", "0xdead", "hi", "1, 2, 3"]);
    }

    #[test]
    fn test_from_json() {
        let json: serde_json::Value = serde_json::json!([["1", 2], true, -3, "0xab"]);
        let value = AbiValue::from_json(&json).unwrap();
        assert_eq!(
            value,
            AbiValue::Array(vec![
                AbiValue::Array(vec![AbiValue::from("1"), AbiValue::uint(2)]),
                AbiValue::Bool(true),
                AbiValue::int(-3),
                AbiValue::from("0xab"),
            ])
        );
        assert!(AbiValue::from_json(&serde_json::json!(null)).is_err());
        assert!(AbiValue::from_json(&serde_json::json!(1.5)).is_err());
    }
}
