//! Serpent type-signature dialect
//!
//! Older contracts describe their arguments with one letter per type:
//! `s` = bytes, `b<N>` = bytesN, `i` = int256, `a` = int256[].

use crate::abi::types::{elementary_name, parse_type_n};
use crate::error::{AbiError, AbiResult};

/// Expand a serpent signature such as `ib32s` into ABI type names
pub fn from_serpent(sig: &str) -> AbiResult<Vec<String>> {
    let mut types = Vec::new();
    let mut chars = sig.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            's' => types.push("bytes".to_string()),
            'b' => {
                let mut name = String::from("bytes");
                while let Some(digit) = chars.next_if(|c| c.is_ascii_digit()) {
                    name.push(digit);
                }
                types.push(name);
            }
            'i' => types.push("int256".to_string()),
            'a' => types.push("int256[]".to_string()),
            other => {
                return Err(AbiError::UnsupportedType(format!("serpent type '{}'", other)));
            }
        }
    }
    Ok(types)
}

/// Collapse ABI type names into a serpent signature
pub fn to_serpent<S: AsRef<str>>(types: &[S]) -> AbiResult<String> {
    let mut sig = String::new();

    for type_name in types {
        let name = elementary_name(type_name.as_ref());
        match name.as_str() {
            "bytes" => sig.push('s'),
            "int256" => sig.push('i'),
            "int256[]" => sig.push('a'),
            other => match other.strip_prefix("bytes") {
                Some(suffix) if !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()) => {
                    let size = parse_type_n(other, suffix)?;
                    sig.push_str(&format!("b{}", size));
                }
                _ => {
                    return Err(AbiError::UnsupportedType(format!("{} has no serpent form", other)));
                }
            },
        }
    }
    Ok(sig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_serpent() {
        assert_eq!(from_serpent("ib32sa").unwrap(), vec!["int256", "bytes32", "bytes", "int256[]"]);
        assert_eq!(from_serpent("b8b16").unwrap(), vec!["bytes8", "bytes16"]);
        assert!(from_serpent("").unwrap().is_empty());
    }

    #[test]
    fn test_to_serpent() {
        assert_eq!(to_serpent(&["int", "bytes32", "bytes", "int256[]"]).unwrap(), "ib32sa");
        assert_eq!(to_serpent(&["int[]"]).unwrap(), "a");
    }

    #[test]
    fn test_unsupported_symbols() {
        assert!(matches!(from_serpent("ix"), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(to_serpent(&["address"]), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(to_serpent(&["uint256"]), Err(AbiError::UnsupportedType(_))));
    }

    #[test]
    fn test_bytes_arrays_have_no_serpent_form() {
        assert!(matches!(to_serpent(&["bytes32[]"]), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(to_serpent(&["bytes[]"]), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(to_serpent(&["bytes4[2]"]), Err(AbiError::UnsupportedType(_))));
        assert!(matches!(to_serpent(&["bytes33"]), Err(AbiError::InvalidWidth { .. })));
    }

    #[test]
    fn test_round_trip() {
        let types = from_serpent("sib4a").unwrap();
        assert_eq!(to_serpent(&types).unwrap(), "sib4a");
    }
}
