//! Canonical device fingerprints.
//!
//! A fingerprint is the per-position majority vote over a device's cohort.
//! Its identity is the SHA-256 digest of the MSB-first packed bytes (the last
//! byte zero-padded), so any single-bit change produces a different digest.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::bits::BitSequence;
use crate::cohort::SampleCohort;
use crate::distance::distance;
use crate::error::Result;
use crate::stats::majority;

/// Default number of bytes shown by [`Fingerprint::hex_preview`].
pub const DEFAULT_PREVIEW_BYTES: usize = 64;

/// Bytes per line in a hex preview.
const PREVIEW_LINE_BYTES: usize = 16;

/// Majority-vote fingerprint of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fingerprint {
    label: String,
    bits: BitSequence,
}

impl Fingerprint {
    pub fn from_cohort(cohort: &SampleCohort) -> Self {
        Self {
            label: cohort.label().to_string(),
            bits: majority(cohort),
        }
    }

    /// Wrap an existing bit sequence, e.g. one loaded from disk.
    pub fn from_bits(label: impl Into<String>, bits: BitSequence) -> Self {
        Self {
            label: label.into(),
            bits,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bits(&self) -> &BitSequence {
        &self.bits
    }

    /// SHA-256 over the packed fingerprint bytes.
    pub fn digest(&self) -> [u8; 32] {
        let mut h = Sha256::new();
        h.update(self.bits.to_packed_bytes());
        h.finalize().into()
    }

    /// Digest as 64 lowercase hex characters.
    pub fn digest_hex(&self) -> String {
        self.digest().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Uppercase hex of the first `n_bytes` bytes, space separated, with a
    /// line break after every 16th byte.
    pub fn hex_preview(&self, n_bytes: usize) -> String {
        let mut out = String::new();
        for (i, byte) in self
            .bits
            .to_packed_bytes()
            .iter()
            .take(n_bytes)
            .enumerate()
        {
            out.push_str(&format!("{byte:02X} "));
            if (i + 1) % PREVIEW_LINE_BYTES == 0 {
                out.push('\n');
            }
        }
        out.trim().to_string()
    }

    /// Hamming distance between two device fingerprints.
    pub fn distance_to(&self, other: &Fingerprint) -> Result<f64> {
        distance(&self.bits, &other.bits)
    }
}
