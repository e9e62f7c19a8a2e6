//! Dense bit sequences and the hex capture decoder.
//!
//! A capture is a text blob of hexadecimal byte pairs separated by spaces,
//! line breaks or periods. Decoding strips those separators, parses
//! consecutive two-character windows as bytes (silently skipping windows that
//! are not valid hex, such as a malformed trailing nibble), and expands every
//! byte most-significant bit first.

use serde::{Deserialize, Serialize};

use crate::error::{PufError, Result};

/// Separators removed before hex pairs are parsed.
const SEPARATORS: [char; 4] = [' ', '\r', '\n', '.'];

/// Immutable, non-empty sequence of bits stored one bit per byte (0 or 1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Build a sequence from 0/1 values.
    ///
    /// Fails with [`PufError::Decode`] on an empty vector and
    /// [`PufError::InvalidMaskByte`] on any value other than 0 or 1.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if bits.is_empty() {
            return Err(PufError::Decode);
        }
        if let Some((offset, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(PufError::InvalidMaskByte { value, offset });
        }
        Ok(Self { bits })
    }

    /// Expand bytes MSB-first into a sequence of `8 * bytes.len()` bits.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for byte in bytes {
            for i in (0..8).rev() {
                bits.push((byte >> i) & 1);
            }
        }
        Self::from_bits(bits)
    }

    /// Build from booleans, `true` mapping to 1.
    pub fn from_bools(values: &[bool]) -> Result<Self> {
        Self::from_bits(values.iter().map(|&b| u8::from(b)).collect())
    }

    /// Internal constructor for vectors already known to be non-empty 0/1.
    pub(crate) fn from_raw(bits: Vec<u8>) -> Self {
        debug_assert!(!bits.is_empty() && bits.iter().all(|&b| b <= 1));
        Self { bits }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false: a sequence holds at least one bit.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<u8> {
        self.bits.get(index).copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.bits.iter().copied()
    }

    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// Strict prefix of `len` bits. Lengths at or beyond the current length
    /// return an unchanged copy; zero is rejected.
    pub fn truncated(&self, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(PufError::Decode);
        }
        Ok(Self::from_raw(self.bits[..len.min(self.bits.len())].to_vec()))
    }

    /// Bitwise XOR with an equal-length sequence.
    pub fn xor(&self, other: &BitSequence) -> Result<Self> {
        if other.len() != self.len() {
            return Err(PufError::LengthMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(Self::from_raw(
            self.bits.iter().zip(&other.bits).map(|(a, b)| a ^ b).collect(),
        ))
    }

    /// Pack bits MSB-first into bytes, zero-padding the last byte.
    pub fn to_packed_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |byte, (i, &bit)| byte | (bit << (7 - i)))
            })
            .collect()
    }
}

impl TryFrom<Vec<u8>> for BitSequence {
    type Error = PufError;

    fn try_from(bits: Vec<u8>) -> Result<Self> {
        Self::from_bits(bits)
    }
}

impl From<BitSequence> for Vec<u8> {
    fn from(seq: BitSequence) -> Self {
        seq.bits
    }
}

/// Parse a cleaned hex capture into bytes, skipping windows that are not hex.
pub fn decode_hex_bytes(text: &str) -> Vec<u8> {
    let chars: Vec<char> = text.chars().filter(|c| !SEPARATORS.contains(c)).collect();
    chars
        .chunks_exact(2)
        .filter_map(|pair| {
            let hi = pair[0].to_digit(16)?;
            let lo = pair[1].to_digit(16)?;
            Some(((hi << 4) | lo) as u8)
        })
        .collect()
}

/// Decode a capture into bits. Returns [`PufError::Decode`] when no byte parses,
/// which callers treat as "no sample".
pub fn decode_hex(text: &str) -> Result<BitSequence> {
    BitSequence::from_bytes(&decode_hex_bytes(text))
}
