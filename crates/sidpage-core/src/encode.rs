//! Field value encoding
//!
//! Converts a typed value into the exact byte width a layout slot
//! requires. Endianness is an explicit parameter on every call; there is
//! no process-wide byte-order state, so pages for different platforms
//! can be encoded side by side.

use crate::error::{Error, Result};
use crate::fields::MfgValueId;

/// Byte order for integer values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    /// Network order (the provisioning default)
    #[default]
    Big,
    /// Little endian
    Little,
}

/// What to do when an encoded length disagrees with the catalog size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizePolicy {
    /// Log and continue (matches the historical tool behavior)
    #[default]
    Warn,
    /// Refuse to emit the field
    Strict,
}

/// A raw value destined for one manufacturing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Unsigned integer, encoded fixed-width per endianness
    Int(u64),
    /// Byte string, used as-is
    Bytes(Vec<u8>),
    /// ASCII string
    Str(String),
}

impl FieldValue {
    /// Length the value occupies before padding, used when no layout
    /// config constrains the field
    pub fn natural_len(&self) -> usize {
        match self {
            FieldValue::Int(v) => int_len(*v),
            FieldValue::Bytes(b) => b.len(),
            FieldValue::Str(s) => s.len(),
        }
    }
}

impl From<u64> for FieldValue {
    fn from(v: u64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Int(v.into())
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(v: Vec<u8>) -> Self {
        FieldValue::Bytes(v)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(v: &[u8]) -> Self {
        FieldValue::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for FieldValue {
    fn from(v: [u8; N]) -> Self {
        FieldValue::Bytes(v.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for FieldValue {
    fn from(v: &[u8; N]) -> Self {
        FieldValue::Bytes(v.to_vec())
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

/// Minimal byte count to represent an integer (at least one)
fn int_len(v: u64) -> usize {
    (u64::BITS - v.leading_zeros()).div_ceil(8).max(1) as usize
}

/// Encode a value into exactly `byte_len` bytes.
///
/// Values shorter than the slot are right-padded with zero bytes; values
/// longer than the slot are a hard error.
pub fn encode_value(
    id: MfgValueId,
    value: &FieldValue,
    byte_len: usize,
    endianness: Endianness,
) -> Result<Vec<u8>> {
    let mut encoded = match value {
        FieldValue::Int(v) => encode_int(id, *v, byte_len, endianness)?,
        FieldValue::Bytes(b) => b.clone(),
        FieldValue::Str(s) => {
            if !s.is_ascii() {
                return Err(Error::NonAsciiString { field: id.name() });
            }
            s.as_bytes().to_vec()
        }
    };

    if encoded.len() < byte_len {
        encoded.resize(byte_len, 0);
    }
    if encoded.len() > byte_len {
        return Err(Error::ValueTooLong {
            field: id.name(),
            len: encoded.len(),
            max: byte_len,
        });
    }
    Ok(encoded)
}

fn encode_int(id: MfgValueId, v: u64, byte_len: usize, endianness: Endianness) -> Result<Vec<u8>> {
    if int_len(v) > byte_len {
        return Err(Error::IntOverflow {
            field: id.name(),
            len: byte_len,
        });
    }

    // Minimal big-endian representation, then widen to the slot
    let minimal: Vec<u8> = v.to_be_bytes()[8 - int_len(v)..].to_vec();
    let mut out = Vec::with_capacity(byte_len);
    match endianness {
        Endianness::Big => {
            out.resize(byte_len - minimal.len(), 0);
            out.extend_from_slice(&minimal);
        }
        Endianness::Little => {
            out.extend(minimal.iter().rev());
            out.resize(byte_len, 0);
        }
    }
    Ok(out)
}
