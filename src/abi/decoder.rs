//! ABI decoder for Solidity/EVM contracts

use std::iter;

use ethers_core::types::{Address, I256, U256};

use super::types::*;
use super::value::{AbiValue, Number};
use crate::error::{AbiError, AbiResult};
use crate::log_debug;

/// Words a decode may read per word of input. A canonical encoding reads
/// each word once; aliased offsets can revisit the same tail many times.
const READS_PER_WORD: usize = 2;

/// ABI decoder
pub struct AbiDecoder;

/// Remaining word reads for one decode call
struct ReadBudget {
    remaining: usize,
}

impl ReadBudget {
    fn for_buffer(data: &[u8]) -> Self {
        Self { remaining: data.len().div_ceil(WORD).saturating_mul(READS_PER_WORD) }
    }

    fn charge(&mut self, data: &[u8], offset: usize, words: usize) -> AbiResult<()> {
        if words > self.remaining {
            return Err(AbiError::OutOfBounds {
                offset,
                needed: words.saturating_mul(WORD),
                available: self.remaining.saturating_mul(WORD).min(data.len().saturating_sub(offset)),
            });
        }
        self.remaining -= words;
        Ok(())
    }
}

impl AbiDecoder {
    /// Decode multiple values (function results, event data)
    pub fn decode(types: &[AbiType], data: &[u8]) -> AbiResult<Vec<AbiValue>> {
        let mut budget = ReadBudget::for_buffer(data);
        let values = Self::decode_sequence(data, 0, types.iter(), &mut budget)?;

        log_debug!(
            "abi::decoder",
            "decoded values",
            args = types.len(),
            bytes = data.len(),
        );
        Ok(values)
    }

    /// Decode a single value whose encoding starts at `offset`.
    /// For dynamic types `offset` points at the tail body, not the head slot.
    pub fn decode_value(data: &[u8], abi_type: &AbiType, offset: usize) -> AbiResult<AbiValue> {
        Self::decode_budgeted(data, abi_type, offset, &mut ReadBudget::for_buffer(data))
    }

    fn decode_budgeted(
        data: &[u8],
        abi_type: &AbiType,
        offset: usize,
        budget: &mut ReadBudget,
    ) -> AbiResult<AbiValue> {
        if !matches!(abi_type, AbiType::Array(_, ArraySize::Fixed(_))) {
            // one head word for static values, one length word for dynamic ones
            budget.charge(data, offset, 1)?;
        }

        match abi_type {
            AbiType::Uint(bits) => {
                let value = read_u256(data, offset)?;
                check_width(abi_type, *bits, value.bits())?;
                Ok(AbiValue::Uint(value))
            }

            AbiType::Int(bits) => {
                let value = I256::from_raw(read_u256(data, offset)?);
                check_width(abi_type, *bits, value.unsigned_abs().bits())?;
                Ok(AbiValue::Int(value))
            }

            AbiType::Address => {
                let word = read_word(data, offset)?;
                check_width(abi_type, 160, U256::from_big_endian(word).bits())?;
                Ok(AbiValue::Address(Address::from_slice(&word[12..])))
            }

            AbiType::Bool => {
                let value = read_u256(data, offset)?;
                check_width(abi_type, 8, value.bits())?;
                match value.low_u64() {
                    0 => Ok(AbiValue::Bool(false)),
                    1 => Ok(AbiValue::Bool(true)),
                    other => Err(AbiError::invalid_value(abi_type, format!("{} is not 0 or 1", other))),
                }
            }

            AbiType::FixedBytes(size) => {
                let word = read_word(data, offset)?;
                Ok(AbiValue::FixedBytes(word[..*size].to_vec()))
            }

            AbiType::Ufixed(_, scale) => {
                let raw = Number::unsigned(read_u256(data, offset)?);
                let value = scale_down(raw, *scale, abi_type)?;
                Ok(AbiValue::Uint(value.magnitude))
            }

            AbiType::Fixed(_, scale) => {
                let raw = Number::signed(I256::from_raw(read_u256(data, offset)?));
                let value = scale_down(raw, *scale, abi_type)?;
                // |quotient| < 2^255 so this always fits
                let signed = value
                    .to_i256()
                    .ok_or_else(|| AbiError::width_exceeded(abi_type, 256, value.bit_length()))?;
                Ok(AbiValue::Int(signed))
            }

            AbiType::Bytes => {
                let bytes = Self::decode_dynamic_bytes(data, offset, budget)?;
                Ok(AbiValue::Bytes(bytes.to_vec()))
            }

            AbiType::String => {
                let bytes = Self::decode_dynamic_bytes(data, offset, budget)?;
                let s = String::from_utf8(bytes.to_vec())
                    .map_err(|_| AbiError::invalid_value(abi_type, "invalid UTF-8 in string"))?;
                Ok(AbiValue::String(s))
            }

            AbiType::Array(inner, ArraySize::Fixed(size)) => {
                ensure_room(data, offset, inner.head_size().saturating_mul(*size))?;
                let types = iter::repeat(&**inner).take(*size);
                let values = Self::decode_sequence(data, offset, types, budget)?;
                Ok(AbiValue::Array(values))
            }

            AbiType::Array(inner, ArraySize::Dynamic) => {
                let length = read_usize(data, offset)?;
                let start = offset + WORD;
                // An untrusted length must not outgrow the buffer
                ensure_room(data, start, inner.head_size().saturating_mul(length))?;
                let types = iter::repeat(&**inner).take(length);
                let values = Self::decode_sequence(data, start, types, budget)?;
                Ok(AbiValue::Array(values))
            }
        }
    }

    /// Walk a head region starting at `base`. Dynamic slots hold offsets
    /// relative to `base`.
    fn decode_sequence<'a, I>(
        data: &[u8],
        base: usize,
        types: I,
        budget: &mut ReadBudget,
    ) -> AbiResult<Vec<AbiValue>>
    where
        I: IntoIterator<Item = &'a AbiType>,
    {
        let mut values = Vec::new();
        let mut cursor = base;

        for abi_type in types {
            if abi_type.is_dynamic() {
                budget.charge(data, cursor, 1)?;
                let relative = read_usize(data, cursor)?;
                let start = base.checked_add(relative).ok_or(AbiError::OutOfBounds {
                    offset: base,
                    needed: relative,
                    available: data.len().saturating_sub(base),
                })?;
                values.push(Self::decode_budgeted(data, abi_type, start, budget)?);
                cursor += WORD;
            } else {
                values.push(Self::decode_budgeted(data, abi_type, cursor, budget)?);
                cursor = cursor.saturating_add(abi_type.head_size());
            }
        }

        Ok(values)
    }

    /// Length word followed by the payload
    fn decode_dynamic_bytes<'d>(
        data: &'d [u8],
        offset: usize,
        budget: &mut ReadBudget,
    ) -> AbiResult<&'d [u8]> {
        let length = read_usize(data, offset)?;
        let start = offset + WORD;
        ensure_room(data, start, length)?;
        budget.charge(data, start, length.div_ceil(WORD))?;
        Ok(&data[start..start + length])
    }
}

/// Divide by 2^scale, refusing to drop a remainder
fn scale_down(raw: Number, scale: usize, abi_type: &AbiType) -> AbiResult<Number> {
    let (quotient, remainder) = raw.magnitude.div_mod(U256::one() << scale);
    if !remainder.is_zero() {
        return Err(AbiError::PrecisionLoss { type_name: abi_type.canonical_type(), scale });
    }
    Ok(Number { negative: raw.negative && !quotient.is_zero(), magnitude: quotient })
}

fn check_width(abi_type: &AbiType, width: usize, bits: usize) -> AbiResult<()> {
    if bits > width {
        return Err(AbiError::width_exceeded(abi_type, width, bits));
    }
    Ok(())
}

fn ensure_room(data: &[u8], offset: usize, needed: usize) -> AbiResult<()> {
    let fits = offset.checked_add(needed).map(|end| end <= data.len()).unwrap_or(false);
    if !fits {
        return Err(AbiError::OutOfBounds {
            offset,
            needed,
            available: data.len().saturating_sub(offset),
        });
    }
    Ok(())
}

fn read_word(data: &[u8], offset: usize) -> AbiResult<&[u8]> {
    ensure_room(data, offset, WORD)?;
    Ok(&data[offset..offset + WORD])
}

fn read_u256(data: &[u8], offset: usize) -> AbiResult<U256> {
    Ok(U256::from_big_endian(read_word(data, offset)?))
}

/// Offsets and lengths; anything that cannot index memory is out of bounds
fn read_usize(data: &[u8], offset: usize) -> AbiResult<usize> {
    let value = read_u256(data, offset)?;
    if value > U256::from(usize::MAX) {
        return Err(AbiError::OutOfBounds {
            offset,
            needed: usize::MAX,
            available: data.len().saturating_sub(offset),
        });
    }
    Ok(value.as_usize())
}
