//! Error taxonomy for PUF analysis.
//!
//! Decode failures are recoverable per capture: the loader skips the sample and
//! keeps going. Everything else aborts the analysis for the device (or device
//! pair) it concerns, since a statistic over a malformed cohort carries no
//! security meaning.

use std::io;
use std::path::PathBuf;

/// Result type alias using [`PufError`].
pub type Result<T> = std::result::Result<T, PufError>;

/// Errors raised by the analysis pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PufError {
    /// A capture produced zero usable bits.
    #[error("capture contains no decodable hex bytes")]
    Decode,

    /// A device produced zero usable samples.
    #[error("device '{device}' has no usable samples")]
    EmptyCohort { device: String },

    /// Distance requested between two zero-length sequences.
    #[error("Hamming distance is undefined over zero positions")]
    DegenerateDistance,

    /// A mask or XOR operand does not match the sequence it is applied to.
    #[error("length mismatch: expected {expected} bits, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A selection mask picked no positions.
    #[error("mask selects no bit positions")]
    EmptySelection,

    /// A persisted bit array holds something other than 0 or 1.
    #[error("invalid bit value {value:#04x} at offset {offset}")]
    InvalidMaskByte { value: u8, offset: usize },

    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PufError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
