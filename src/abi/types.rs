//! ABI type grammar for Solidity/EVM contracts
//!
//! Parses type strings such as `uint256[][3]`, `bytes32` or `address` into an
//! [`AbiType`] tree. Short aliases (`uint`, `int`, `fixed`, `ufixed`) are
//! expanded before classification so the canonical name is always the one
//! that goes into selectors.

use std::fmt;
use std::str::FromStr;

use crate::error::{AbiError, AbiResult};

/// Size of one ABI word in bytes
pub const WORD: usize = 32;

/// Fractional bits used by the `fixed` / `ufixed` aliases
pub const DEFAULT_FIXED_SCALE: usize = 128;

/// Length of an array type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArraySize {
    /// `T[N]`
    Fixed(usize),
    /// `T[]`
    Dynamic,
}

/// A parsed ABI type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbiType {
    Bool,
    Address,
    /// `uintN`, N in bits
    Uint(usize),
    /// `intN`, N in bits
    Int(usize),
    /// `bytesN`, N in bytes
    FixedBytes(usize),
    Bytes,
    String,
    /// `ufixedNxM`: total bits, fractional bits
    Ufixed(usize, usize),
    /// `fixedNxM`: total bits, fractional bits
    Fixed(usize, usize),
    Array(Box<AbiType>, ArraySize),
}

impl AbiType {
    /// Parse a type string, expanding aliases first
    pub fn parse(type_str: &str) -> AbiResult<Self> {
        let normalized = elementary_name(type_str);
        Self::parse_normalized(&normalized)
    }

    fn parse_normalized(s: &str) -> AbiResult<Self> {
        if s.ends_with(']') {
            // Peel the outermost (rightmost) suffix first
            let open = s.rfind('[').ok_or_else(|| AbiError::TypeSyntax(s.to_string()))?;
            let inner = &s[..open];
            let size_str = &s[open + 1..s.len() - 1];

            if inner.is_empty() {
                return Err(AbiError::TypeSyntax(s.to_string()));
            }

            let size = if size_str.is_empty() {
                ArraySize::Dynamic
            } else {
                if !size_str.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(AbiError::TypeSyntax(format!(
                        "{}: invalid array size '{}'",
                        s, size_str
                    )));
                }
                let size: usize = size_str.parse().map_err(|_| {
                    AbiError::TypeSyntax(format!("{}: array size too large", s))
                })?;
                if size == 0 {
                    return Err(AbiError::TypeSyntax(format!("{}: array size must be positive", s)));
                }
                ArraySize::Fixed(size)
            };

            let element = Self::parse_normalized(inner)?;
            return Ok(AbiType::Array(Box::new(element), size));
        }

        Self::parse_elementary(s)
    }

    fn parse_elementary(s: &str) -> AbiResult<Self> {
        if s.starts_with('(') || s.contains(',') {
            return Err(AbiError::UnsupportedType(format!("{} (tuples are not supported)", s)));
        }
        if s.is_empty()
            || !s.starts_with(|c: char| c.is_ascii_lowercase())
            || !s.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(AbiError::TypeSyntax(s.to_string()));
        }

        match s {
            "bool" => return Ok(AbiType::Bool),
            "address" => return Ok(AbiType::Address),
            "string" => return Ok(AbiType::String),
            "bytes" => return Ok(AbiType::Bytes),
            _ => {}
        }

        let prefix_len = s.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(s.len());
        let (prefix, suffix) = s.split_at(prefix_len);

        match prefix {
            "uint" => {
                let bits = parse_type_n(s, suffix)?;
                check_int_width(s, bits)?;
                Ok(AbiType::Uint(bits))
            }
            "int" => {
                let bits = parse_type_n(s, suffix)?;
                check_int_width(s, bits)?;
                Ok(AbiType::Int(bits))
            }
            "bytes" => {
                let size = parse_type_n(s, suffix)?;
                if !(1..=32).contains(&size) {
                    return Err(AbiError::invalid_width(s, format!("bytes<N> width must be 1-32, got {}", size)));
                }
                Ok(AbiType::FixedBytes(size))
            }
            "ufixed" | "fixed" => {
                let (bits, scale) = parse_type_nxm(s, suffix)?;
                check_int_width(s, bits)?;
                if scale > bits || scale >= 256 {
                    return Err(AbiError::invalid_width(
                        s,
                        format!("fractional bits {} must not exceed total bits {}", scale, bits),
                    ));
                }
                if prefix == "ufixed" {
                    Ok(AbiType::Ufixed(bits, scale))
                } else {
                    Ok(AbiType::Fixed(bits, scale))
                }
            }
            _ => Err(AbiError::UnsupportedType(s.to_string())),
        }
    }

    /// Check if the type is dynamic (requires offset encoding)
    pub fn is_dynamic(&self) -> bool {
        match self {
            AbiType::Bytes | AbiType::String => true,
            AbiType::Array(_, ArraySize::Dynamic) => true,
            AbiType::Array(inner, ArraySize::Fixed(_)) => inner.is_dynamic(),
            _ => false,
        }
    }

    /// Number of words a static instance occupies in the head.
    /// Dynamic types occupy a single offset word.
    pub fn word_size(&self) -> usize {
        match self {
            AbiType::Array(inner, ArraySize::Fixed(size)) if !self.is_dynamic() => {
                inner.word_size().saturating_mul(*size)
            }
            _ => 1,
        }
    }

    /// Bytes this type occupies in the head region
    pub fn head_size(&self) -> usize {
        self.word_size().saturating_mul(WORD)
    }

    pub fn is_array(&self) -> bool {
        matches!(self, AbiType::Array(..))
    }

    /// Get the canonical type string for signature calculation
    pub fn canonical_type(&self) -> String {
        match self {
            AbiType::Bool => "bool".to_string(),
            AbiType::Address => "address".to_string(),
            AbiType::Uint(bits) => format!("uint{}", bits),
            AbiType::Int(bits) => format!("int{}", bits),
            AbiType::FixedBytes(size) => format!("bytes{}", size),
            AbiType::Bytes => "bytes".to_string(),
            AbiType::String => "string".to_string(),
            AbiType::Ufixed(bits, scale) => format!("ufixed{}x{}", bits, scale),
            AbiType::Fixed(bits, scale) => format!("fixed{}x{}", bits, scale),
            AbiType::Array(inner, ArraySize::Dynamic) => format!("{}[]", inner.canonical_type()),
            AbiType::Array(inner, ArraySize::Fixed(size)) => {
                format!("{}[{}]", inner.canonical_type(), size)
            }
        }
    }
}

impl FromStr for AbiType {
    type Err = AbiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for AbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_type())
    }
}

/// Parse a list of type strings
pub fn parse_types<S: AsRef<str>>(types: &[S]) -> AbiResult<Vec<AbiType>> {
    types.iter().map(|t| AbiType::parse(t.as_ref())).collect()
}

/// Convert short aliases to canonical names, keeping any array suffix.
/// `int` -> `int256`, `uint[2]` -> `uint256[2]`, `fixed` -> `fixed128x128`.
pub fn elementary_name(name: &str) -> String {
    let split = name.find('[').unwrap_or(name.len());
    let (base, suffix) = name.split_at(split);
    let canonical = match base {
        "int" => "int256",
        "uint" => "uint256",
        "fixed" => "fixed128x128",
        "ufixed" => "ufixed128x128",
        other => other,
    };
    format!("{}{}", canonical, suffix)
}

/// Parse N from `type<N>`
pub fn parse_type_n(type_name: &str, suffix: &str) -> AbiResult<usize> {
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AbiError::invalid_width(type_name, format!("'{}' is not a decimal width", suffix)));
    }
    suffix
        .parse()
        .map_err(|_| AbiError::invalid_width(type_name, format!("width '{}' is too large", suffix)))
}

/// Parse N, M from `type<N>x<M>`
pub fn parse_type_nxm(type_name: &str, suffix: &str) -> AbiResult<(usize, usize)> {
    let (n, m) = suffix.split_once('x').ok_or_else(|| {
        AbiError::invalid_width(type_name, format!("'{}' is not of the form <N>x<M>", suffix))
    })?;
    Ok((parse_type_n(type_name, n)?, parse_type_n(type_name, m)?))
}

fn check_int_width(type_name: &str, bits: usize) -> AbiResult<()> {
    if bits % 8 != 0 || !(8..=256).contains(&bits) {
        return Err(AbiError::invalid_width(
            type_name,
            format!("int/uint<N> width must be a multiple of 8 in 8-256, got {}", bits),
        ));
    }
    Ok(())
}
