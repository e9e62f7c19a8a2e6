//! Deterministic XOR debiasing.
//!
//! SRAM power-up states are usually biased toward 0. The mask built here
//! pulls a cohort's global 1-rate up toward 0.5 by flipping positions that are
//! (almost) always zero, leaving bits that vary between boots untouched.
//!
//! # Algorithm
//!
//! ```text
//! rates        = per-bit 1-rate
//! target_ratio = 0.5 - mean(rates)
//! eligible     = { i : rates[i] < 0.05 }
//! requested    = floor(target_ratio * L)        (0 when target_ratio <= 0)
//! flipped      = min(requested, |eligible|)
//! mask         = `flipped` eligible positions drawn without replacement
//!                from StdRng seeded with `DebiasConfig::seed`
//! ```
//!
//! Only a deficit of ones can be corrected: a cohort already at or above 0.5
//! gets an all-zero mask. The mask shifts bit weight but does not make the
//! cohort more reproducible; re-measure intra-distance after applying it.

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::bits::BitSequence;
use crate::cohort::SampleCohort;
use crate::error::{PufError, Result};
use crate::stats::per_bit_rate;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;
/// Per-bit 1-rate below which a position counts as stable-zero.
pub const STABLE_ZERO_RATE: f64 = 0.05;
/// Global 1-rate the mask aims for.
pub const TARGET_RATE: f64 = 0.5;

/// Debias parameters. The seed is explicit so the same cohort always yields
/// the same mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebiasConfig {
    pub seed: u64,
    pub stable_zero_rate: f64,
}

impl Default for DebiasConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            stable_zero_rate: STABLE_ZERO_RATE,
        }
    }
}

/// Sparse XOR mask built for one cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XorMask {
    bits: Vec<u8>,
}

/// A mask together with how much of the requested correction it achieves.
#[derive(Debug, Clone, Serialize)]
pub struct DebiasOutcome {
    pub mask: XorMask,
    /// Global 1-rate of the cohort the mask was built from.
    pub rate_before: f64,
    /// Global 1-rate after applying the mask to that cohort.
    pub rate_after: f64,
    /// Stable-zero positions available for flipping.
    pub eligible: usize,
    /// Flips needed to reach the target rate.
    pub requested: usize,
    /// Flips actually placed in the mask.
    pub flipped: usize,
}

impl DebiasOutcome {
    /// Flips that could not be placed because the eligible pool ran out.
    pub fn shortfall(&self) -> usize {
        self.requested - self.flipped
    }
}

impl XorMask {
    /// Build the debias mask for `cohort`.
    pub fn build(cohort: &SampleCohort, config: &DebiasConfig) -> DebiasOutcome {
        let rates = per_bit_rate(cohort);
        let len = rates.len();
        let rate_before = rates.iter().sum::<f64>() / len as f64;
        let target_ratio = TARGET_RATE - rate_before;

        let eligible: Vec<usize> = rates
            .iter()
            .enumerate()
            .filter_map(|(i, &r)| (r < config.stable_zero_rate).then_some(i))
            .collect();
        let requested = if target_ratio > 0.0 {
            (target_ratio * len as f64).floor() as usize
        } else {
            0
        };
        let flipped = requested.min(eligible.len());

        let mut bits = vec![0u8; len];
        let mut rng = StdRng::seed_from_u64(config.seed);
        for pick in rand::seq::index::sample(&mut rng, eligible.len(), flipped) {
            bits[eligible[pick]] = 1;
        }

        // Each flipped position moves from rate r to 1 - r.
        let shift: f64 = bits
            .iter()
            .zip(&rates)
            .filter(|&(&m, _)| m == 1)
            .map(|(_, &r)| 1.0 - 2.0 * r)
            .sum();
        let rate_after = rate_before + shift / len as f64;

        debug!(
            "debias '{}': rate {rate_before:.4} -> {rate_after:.4}, {flipped}/{requested} flips, {} eligible",
            cohort.label(),
            eligible.len()
        );
        if flipped < requested {
            warn!(
                "debias '{}': only {} of {} requested flips available",
                cohort.label(),
                flipped,
                requested
            );
        }

        DebiasOutcome {
            mask: XorMask { bits },
            rate_before,
            rate_after,
            eligible: eligible.len(),
            requested,
            flipped,
        }
    }

    /// Wrap a previously persisted mask.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if let Some((offset, &value)) = bits.iter().enumerate().find(|&(_, &b)| b > 1) {
            return Err(PufError::InvalidMaskByte { value, offset });
        }
        Ok(Self { bits })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of positions the mask flips.
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }

    /// `seq XOR mask`; the lengths must match.
    pub fn apply(&self, seq: &BitSequence) -> Result<BitSequence> {
        if seq.len() != self.bits.len() {
            return Err(PufError::LengthMismatch {
                expected: self.bits.len(),
                actual: seq.len(),
            });
        }
        Ok(BitSequence::from_raw(
            seq.iter().zip(&self.bits).map(|(b, m)| b ^ m).collect(),
        ))
    }

    /// Apply the mask to every member of a cohort.
    pub fn apply_cohort(&self, cohort: &SampleCohort) -> Result<SampleCohort> {
        cohort.map_samples(|s| self.apply(s))
    }
}
