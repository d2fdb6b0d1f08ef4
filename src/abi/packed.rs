//! Non-standard packed encoding (`abi.encodePacked`)
//!
//! Values are concatenated at their natural width with no padding and no
//! offsets. Only elementary types are supported.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use super::encoder::uint_word;
use super::selector::AbiSelector;
use super::types::*;
use super::value::AbiValue;
use crate::error::{AbiError, AbiResult};

/// Tightly pack values according to their types
pub fn solidity_pack(types: &[AbiType], values: &[AbiValue]) -> AbiResult<Vec<u8>> {
    if types.len() != values.len() {
        return Err(AbiError::ArgumentCount { types: types.len(), values: values.len() });
    }

    let mut packed = Vec::new();
    for (abi_type, value) in types.iter().zip(values) {
        match abi_type {
            AbiType::Bytes => packed.extend_from_slice(&value.as_bytes(abi_type, true)?),
            AbiType::String => packed.extend_from_slice(value.as_str(abi_type)?.as_bytes()),
            AbiType::Bool => packed.push(value.as_bool(abi_type)? as u8),
            AbiType::Address => packed.extend_from_slice(value.as_address(abi_type)?.as_bytes()),

            AbiType::FixedBytes(size) => {
                let bytes = value.as_bytes(abi_type, false)?;
                if bytes.len() > *size {
                    return Err(AbiError::width_exceeded(abi_type, size * 8, bytes.len() * 8));
                }
                let start = packed.len();
                packed.extend_from_slice(&bytes);
                packed.resize(start + size, 0);
            }

            AbiType::Uint(bits) => {
                let number = value.as_number(abi_type)?;
                if number.negative || number.bit_length() > *bits {
                    return Err(AbiError::width_exceeded(abi_type, *bits, number.bit_length()));
                }
                packed.extend_from_slice(&uint_word(number.magnitude)[WORD - bits / 8..]);
            }

            AbiType::Int(bits) => {
                let number = value.as_number(abi_type)?;
                if number.bit_length() > *bits {
                    return Err(AbiError::width_exceeded(abi_type, *bits, number.bit_length()));
                }
                let signed = number
                    .to_i256()
                    .ok_or_else(|| AbiError::width_exceeded(abi_type, 256, number.bit_length() + 1))?;
                // Low N bits of the 256-bit two's complement are N-bit two's complement
                packed.extend_from_slice(&uint_word(signed.into_raw())[WORD - bits / 8..]);
            }

            AbiType::Ufixed(..) | AbiType::Fixed(..) | AbiType::Array(..) => {
                return Err(AbiError::UnsupportedType(format!(
                    "{} (not supported in packed mode)",
                    abi_type
                )));
            }
        }
    }
    Ok(packed)
}

/// keccak256 of the packed encoding
pub fn solidity_sha3(types: &[AbiType], values: &[AbiValue]) -> AbiResult<[u8; 32]> {
    Ok(AbiSelector::keccak256(&solidity_pack(types, values)?))
}

/// SHA-256 of the packed encoding
pub fn solidity_sha256(types: &[AbiType], values: &[AbiValue]) -> AbiResult<[u8; 32]> {
    Ok(Sha256::digest(solidity_pack(types, values)?).into())
}

/// RIPEMD-160 of the packed encoding, left-padded to 32 bytes
pub fn solidity_ripemd160(types: &[AbiType], values: &[AbiValue]) -> AbiResult<[u8; 32]> {
    let hash = Ripemd160::digest(solidity_pack(types, values)?);
    let mut result = [0u8; 32];
    result[12..].copy_from_slice(&hash);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pack(types: &[&str], values: Vec<AbiValue>) -> AbiResult<Vec<u8>> {
        solidity_pack(&parse_types(types)?, &values)
    }

    #[test]
    fn test_pack_natural_widths() {
        let packed = pack(
            &["uint8", "uint16", "bool", "bytes2"],
            vec![AbiValue::uint(1), AbiValue::uint(0x0203), AbiValue::Bool(true), AbiValue::from("0xaa")],
        )
        .unwrap();
        assert_eq!(packed, vec![0x01, 0x02, 0x03, 0x01, 0xaa, 0x00]);
    }

    #[test]
    fn test_pack_address_and_string() {
        let packed = pack(
            &["address", "string"],
            vec![AbiValue::from("0x00000000000000000000000000000000000000ff"), AbiValue::from("hi")],
        )
        .unwrap();
        assert_eq!(packed.len(), 22);
        assert_eq!(packed[19], 0xff);
        assert_eq!(&packed[20..], b"hi");
    }

    #[test]
    fn test_pack_int_twos_complement_at_width() {
        assert_eq!(pack(&["int8"], vec![AbiValue::int(-1)]).unwrap(), vec![0xff]);
        assert_eq!(pack(&["int16"], vec![AbiValue::int(-2)]).unwrap(), vec![0xff, 0xfe]);
        assert_eq!(pack(&["int8"], vec![AbiValue::int(-128)]).unwrap(), vec![0x80]);
        assert!(matches!(
            pack(&["int8"], vec![AbiValue::int(-256)]),
            Err(AbiError::WidthExceeded { width: 8, bits: 9, .. })
        ));
    }

    #[test]
    fn test_pack_width_checks() {
        assert!(matches!(
            pack(&["uint8"], vec![AbiValue::uint(256)]),
            Err(AbiError::WidthExceeded { .. })
        ));
        assert!(matches!(
            pack(&["bytes1"], vec![AbiValue::from("0xaabb")]),
            Err(AbiError::WidthExceeded { .. })
        ));
    }

    #[test]
    fn test_pack_unsupported() {
        assert!(matches!(
            pack(&["uint256[]"], vec![AbiValue::from(vec![1u64])]),
            Err(AbiError::UnsupportedType(_))
        ));
        assert!(matches!(pack(&["fixed"], vec![AbiValue::uint(1)]), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(pack(&["uint8"], vec![]), Err(AbiError::ArgumentCount { .. })));
    }

    #[test]
    fn test_solidity_hashes() {
        let types = parse_types(&["string"]).unwrap();
        let values = [AbiValue::from("abc")];

        assert_eq!(
            hex::encode(solidity_sha3(&types, &values).unwrap()),
            "4e03657aea45a94fc7d47ba826c8d667c0d1e6e33a64a036ec44f58fa12d6c45"
        );
        assert_eq!(
            hex::encode(solidity_sha256(&types, &values).unwrap()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );

        let ripemd = solidity_ripemd160(&types, &values).unwrap();
        assert_eq!(&ripemd[..12], &[0u8; 12]);
        assert_eq!(hex::encode(&ripemd[12..]), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
    }
}
