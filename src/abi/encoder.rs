//! ABI encoder for Solidity/EVM contracts

use ethers_core::types::U256;

use super::types::*;
use super::value::{AbiValue, Number};
use crate::error::{AbiError, AbiResult};
use crate::log_debug;

/// ABI encoder
pub struct AbiEncoder;

impl AbiEncoder {
    /// Encode multiple values (for function calls)
    pub fn encode(types: &[AbiType], values: &[AbiValue]) -> AbiResult<Vec<u8>> {
        if types.len() != values.len() {
            return Err(AbiError::ArgumentCount { types: types.len(), values: values.len() });
        }

        let encoded = Self::encode_sequence(types.iter().zip(values))?;

        log_debug!(
            "abi::encoder",
            "encoded arguments",
            args = types.len(),
            bytes = encoded.len(),
            payload = format!("0x{}", hex::encode(&encoded)),
        );
        Ok(encoded)
    }

    /// Encode a single value according to its type.
    /// Dynamic values come back as their tail body (length word included).
    pub fn encode_value(value: &AbiValue, abi_type: &AbiType) -> AbiResult<Vec<u8>> {
        match abi_type {
            AbiType::Bool => Ok(uint_word(U256::from(value.as_bool(abi_type)? as u8)).to_vec()),

            AbiType::Address => {
                let address = value.as_address(abi_type)?;
                let mut result = [0u8; WORD];
                result[12..].copy_from_slice(address.as_bytes());
                Ok(result.to_vec())
            }

            AbiType::Uint(bits) => Self::encode_uint(value.as_number(abi_type)?, *bits, abi_type),

            AbiType::Int(bits) => Self::encode_int(value.as_number(abi_type)?, *bits, abi_type),

            AbiType::Ufixed(_, scale) => {
                let scaled = scale_up(value.as_number(abi_type)?, *scale, abi_type)?;
                Self::encode_uint(scaled, 256, abi_type)
            }

            AbiType::Fixed(_, scale) => {
                let scaled = scale_up(value.as_number(abi_type)?, *scale, abi_type)?;
                Self::encode_int(scaled, 256, abi_type)
            }

            AbiType::FixedBytes(size) => {
                let bytes = value.as_bytes(abi_type, false)?;
                if bytes.len() > *size {
                    return Err(AbiError::width_exceeded(abi_type, size * 8, bytes.len() * 8));
                }
                let mut result = [0u8; WORD];
                result[..bytes.len()].copy_from_slice(&bytes);
                Ok(result.to_vec())
            }

            AbiType::Bytes => Ok(Self::encode_dynamic_bytes(&value.as_bytes(abi_type, true)?)),

            AbiType::String => Ok(Self::encode_dynamic_bytes(value.as_str(abi_type)?.as_bytes())),

            AbiType::Array(inner, ArraySize::Fixed(size)) => {
                let items = value.as_array(abi_type)?;
                if items.len() != *size {
                    return Err(AbiError::ArrayLength {
                        type_name: abi_type.canonical_type(),
                        expected: *size,
                        got: items.len(),
                    });
                }
                Self::encode_array_body(items, inner)
            }

            AbiType::Array(inner, ArraySize::Dynamic) => {
                let items = value.as_array(abi_type)?;
                let mut result = uint_word(U256::from(items.len())).to_vec();
                result.extend_from_slice(&Self::encode_array_body(items, inner)?);
                Ok(result)
            }
        }
    }

    /// Head/tail layout over a sequence of (type, value) pairs.
    /// Offsets are relative to the start of the sequence.
    ///
    /// The head is sized from the encoded parts, never from the type alone:
    /// a type such as `uint8[1000000000000000]` must fail on its value before
    /// anything is reserved for it.
    fn encode_sequence<'a, I>(pairs: I) -> AbiResult<Vec<u8>>
    where
        I: IntoIterator<Item = (&'a AbiType, &'a AbiValue)>,
    {
        let mut parts = Vec::new();
        for (abi_type, value) in pairs {
            parts.push((abi_type.is_dynamic(), Self::encode_value(value, abi_type)?));
        }

        let head_size: usize = parts
            .iter()
            .map(|(dynamic, body)| if *dynamic { WORD } else { body.len() })
            .sum();

        let mut head = Vec::with_capacity(head_size);
        let mut tail = Vec::new();
        for (dynamic, body) in parts {
            if dynamic {
                head.extend_from_slice(&uint_word(U256::from(head_size + tail.len())));
                tail.extend_from_slice(&body);
            } else {
                head.extend_from_slice(&body);
            }
        }

        head.extend_from_slice(&tail);
        Ok(head)
    }

    /// Array elements, laid out like a sequence of the element type
    fn encode_array_body(items: &[AbiValue], inner: &AbiType) -> AbiResult<Vec<u8>> {
        Self::encode_sequence(items.iter().map(|item| (inner, item)))
    }

    fn encode_uint(number: Number, bits: usize, abi_type: &AbiType) -> AbiResult<Vec<u8>> {
        if number.negative || number.bit_length() > bits {
            return Err(AbiError::width_exceeded(abi_type, bits, number.bit_length()));
        }
        Ok(uint_word(number.magnitude).to_vec())
    }

    /// Always two's complement over the full 256-bit word, whatever `bits` is
    fn encode_int(number: Number, bits: usize, abi_type: &AbiType) -> AbiResult<Vec<u8>> {
        if number.bit_length() > bits {
            return Err(AbiError::width_exceeded(abi_type, bits, number.bit_length()));
        }
        let signed = number
            .to_i256()
            .ok_or_else(|| AbiError::width_exceeded(abi_type, 256, number.bit_length() + 1))?;
        Ok(uint_word(signed.into_raw()).to_vec())
    }

    /// Encode dynamic bytes: length word, then data right-padded to 32
    fn encode_dynamic_bytes(bytes: &[u8]) -> Vec<u8> {
        let len = bytes.len();
        let padded_len = len.div_ceil(WORD) * WORD;

        let mut result = Vec::with_capacity(WORD + padded_len);
        result.extend_from_slice(&uint_word(U256::from(len)));
        result.extend_from_slice(bytes);
        result.resize(WORD + padded_len, 0);
        result
    }
}

/// Multiply by 2^scale for fixed-point types
fn scale_up(number: Number, scale: usize, abi_type: &AbiType) -> AbiResult<Number> {
    if matches!(abi_type, AbiType::Ufixed(..)) && number.negative {
        return Err(AbiError::width_exceeded(abi_type, 256, number.bit_length()));
    }
    let magnitude = number
        .magnitude
        .checked_mul(U256::one() << scale)
        .ok_or_else(|| AbiError::width_exceeded(abi_type, 256, number.bit_length() + scale))?;
    Ok(Number { negative: number.negative, magnitude })
}

/// Big-endian 32-byte word
pub(crate) fn uint_word(value: U256) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    value.to_big_endian(&mut word);
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(types: &[&str], values: Vec<AbiValue>) -> AbiResult<Vec<u8>> {
        AbiEncoder::encode(&parse_types(types)?, &values)
    }

    #[test]
    fn test_encode_uint256() {
        let encoded = AbiEncoder::encode_value(&AbiValue::uint(256), &AbiType::Uint(256)).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[30], 1);
        assert_eq!(encoded[31], 0);
    }

    #[test]
    fn test_uint8_width_boundary() {
        let ok = encode(&["uint8"], vec!["255".into()]).unwrap();
        assert_eq!(hex::encode(&ok), format!("{}ff", "00".repeat(31)));

        let err = encode(&["uint8"], vec!["256".into()]).unwrap_err();
        assert_eq!(
            err,
            AbiError::WidthExceeded { type_name: "uint8".into(), width: 8, bits: 9 }
        );
    }

    #[test]
    fn test_uint_rejects_negative() {
        let err = encode(&["uint256"], vec!["-1".into()]).unwrap_err();
        assert!(matches!(err, AbiError::WidthExceeded { .. }));
    }

    #[test]
    fn test_encode_int_widens_to_256_bits() {
        let encoded = encode(&["int8"], vec![AbiValue::int(-1)]).unwrap();
        assert_eq!(encoded, vec![0xff; 32]);

        let encoded = encode(&["int16"], vec!["-2".into()]).unwrap();
        assert_eq!(&encoded[..31], &[0xff; 31]);
        assert_eq!(encoded[31], 0xfe);

        let err = encode(&["int8"], vec!["-256".into()]).unwrap_err();
        assert!(matches!(err, AbiError::WidthExceeded { width: 8, bits: 9, .. }));
    }

    #[test]
    fn test_encode_int256_bounds() {
        let min = format!("-0x8{}", "0".repeat(63));
        let encoded = encode(&["int256"], vec![min.into()]).unwrap();
        assert_eq!(encoded[0], 0x80);
        assert!(encoded[1..].iter().all(|b| *b == 0));

        let over = format!("0x8{}", "0".repeat(63));
        assert!(matches!(
            encode(&["int256"], vec![over.into()]),
            Err(AbiError::WidthExceeded { .. })
        ));
    }

    #[test]
    fn test_encode_address() {
        let mut addr = [0u8; 20];
        addr[0] = 0xde;
        addr[19] = 0xad;

        let value = AbiValue::Address(addr.into());
        let encoded = AbiEncoder::encode_value(&value, &AbiType::Address).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(encoded[12], 0xde);
        assert_eq!(encoded[31], 0xad);
    }

    #[test]
    fn test_encode_bool() {
        let encoded_true = AbiEncoder::encode_value(&AbiValue::Bool(true), &AbiType::Bool).unwrap();
        let encoded_false = AbiEncoder::encode_value(&AbiValue::Bool(false), &AbiType::Bool).unwrap();

        assert_eq!(encoded_true[31], 1);
        assert_eq!(encoded_false[31], 0);
        assert!(AbiEncoder::encode_value(&AbiValue::uint(1), &AbiType::Bool).is_err());
    }

    #[test]
    fn test_encode_fixed_bytes() {
        let value = AbiValue::FixedBytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let encoded = AbiEncoder::encode_value(&value, &AbiType::FixedBytes(4)).unwrap();

        assert_eq!(encoded.len(), 32);
        assert_eq!(&encoded[..4], &[0xde, 0xad, 0xbe, 0xef]);
        assert!(encoded[4..].iter().all(|b| *b == 0));

        let from_hex = AbiEncoder::encode_value(&"0xdead".into(), &AbiType::FixedBytes(4)).unwrap();
        assert_eq!(&from_hex[..4], &[0xde, 0xad, 0, 0]);

        let err = AbiEncoder::encode_value(&value, &AbiType::FixedBytes(2)).unwrap_err();
        assert!(matches!(err, AbiError::WidthExceeded { width: 16, bits: 32, .. }));
    }

    #[test]
    fn test_encode_dynamic_bytes() {
        let value = AbiValue::Bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        let encoded = AbiEncoder::encode_value(&value, &AbiType::Bytes).unwrap();

        // 32 bytes for length + 32 bytes for padded data
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 4);
        assert_eq!(&encoded[32..36], &[0xde, 0xad, 0xbe, 0xef]);

        // exact multiple of 32 gets no extra padding
        let full = AbiEncoder::encode_value(&AbiValue::Bytes(vec![1; 32]), &AbiType::Bytes).unwrap();
        assert_eq!(full.len(), 64);

        let empty = AbiEncoder::encode_value(&AbiValue::Bytes(vec![]), &AbiType::Bytes).unwrap();
        assert_eq!(empty, vec![0; 32]);
    }

    #[test]
    fn test_encode_string() {
        let value = AbiValue::String("Hello".to_string());
        let encoded = AbiEncoder::encode_value(&value, &AbiType::String).unwrap();

        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 5);
        assert_eq!(&encoded[32..37], b"Hello");
    }

    #[test]
    fn test_encode_ufixed() {
        let encoded = encode(&["ufixed"], vec!["1".into()]).unwrap();
        // 1 * 2^128
        assert_eq!(encoded[15], 1);
        assert!(encoded[16..].iter().all(|b| *b == 0));

        assert!(matches!(
            encode(&["ufixed"], vec!["-1".into()]),
            Err(AbiError::WidthExceeded { .. })
        ));
    }

    #[test]
    fn test_encode_fixed_negative() {
        let encoded = encode(&["fixed"], vec!["-1".into()]).unwrap();
        // -(2^128) in two's complement
        assert!(encoded[..16].iter().all(|b| *b == 0xff));
        assert!(encoded[16..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_dynamic_array() {
        let encoded = encode(&["uint256[]"], vec![AbiValue::from(vec!["1", "2"])]).unwrap();

        assert_eq!(encoded.len(), 128);
        assert_eq!(encoded[31], 0x20); // offset
        assert_eq!(encoded[63], 2); // length
        assert_eq!(encoded[95], 1);
        assert_eq!(encoded[127], 2);
    }

    #[test]
    fn test_encode_fixed_array_is_inline() {
        let encoded = encode(&["uint8[2]", "bool"], vec![AbiValue::from(vec![7u64, 9]), true.into()])
            .unwrap();
        assert_eq!(encoded.len(), 96);
        assert_eq!(encoded[31], 7);
        assert_eq!(encoded[63], 9);
        assert_eq!(encoded[95], 1);
    }

    #[test]
    fn test_fixed_array_length_checked() {
        let err = encode(&["uint8[3]"], vec![AbiValue::from(vec![1u64, 2])]).unwrap_err();
        assert_eq!(
            err,
            AbiError::ArrayLength { type_name: "uint8[3]".into(), expected: 3, got: 2 }
        );
    }

    #[test]
    fn test_oversized_fixed_array_reports_length() {
        let err = encode(&["uint8[1000000000000000]"], vec![AbiValue::Array(vec![])]).unwrap_err();
        assert_eq!(
            err,
            AbiError::ArrayLength {
                type_name: "uint8[1000000000000000]".into(),
                expected: 1_000_000_000_000_000,
                got: 0,
            }
        );

        // Two of these together would overflow a type-derived head size
        let huge = "uint8[576460752303423487]";
        let err = encode(&[huge, huge], vec![AbiValue::Array(vec![]), AbiValue::Array(vec![])])
            .unwrap_err();
        assert!(matches!(err, AbiError::ArrayLength { got: 0, .. }));

        let err = encode(&["string", huge], vec!["a".into(), AbiValue::Array(vec![])]).unwrap_err();
        assert!(matches!(err, AbiError::ArrayLength { expected: 576460752303423487, .. }));
    }

    #[test]
    fn test_nested_dynamic_offsets_are_relative() {
        // string[2] is dynamic: offset at top, inner offsets relative to the array body
        let encoded = encode(&["string[2]"], vec![AbiValue::from(vec!["a", "b"])]).unwrap();
        assert_eq!(encoded[31], 0x20);
        assert_eq!(encoded[63], 0x40);
        assert_eq!(encoded[95], 0x80);
        assert_eq!(encoded[127], 1);
        assert_eq!(encoded[128], b'a');
        assert_eq!(encoded.len(), 32 + 64 + 64 + 64);
    }

    #[test]
    fn test_encode_mixed_dynamic_static() {
        let values = vec![AbiValue::uint(42), "test".into(), AbiValue::uint(100)];
        let encoded = encode(&["uint256", "string", "uint256"], values).unwrap();

        // Head: 3 words, tail: length + padded string
        assert_eq!(encoded.len(), 160);
        assert_eq!(encoded[31], 42);
        assert_eq!(encoded[63], 96);
        assert_eq!(encoded[95], 100);
        assert_eq!(encoded[127], 4);
        assert_eq!(&encoded[128..132], b"test");
    }

    #[test]
    fn test_argument_count() {
        let err = encode(&["uint256", "bool"], vec![AbiValue::uint(1)]).unwrap_err();
        assert_eq!(err, AbiError::ArgumentCount { types: 2, values: 1 });
    }

    #[test]
    fn test_value_shape_mismatch() {
        assert!(matches!(
            encode(&["uint256[]"], vec![AbiValue::uint(1)]),
            Err(AbiError::InvalidValue { .. })
        ));
        assert!(matches!(
            encode(&["string"], vec![AbiValue::uint(1)]),
            Err(AbiError::InvalidValue { .. })
        ));
    }
}
