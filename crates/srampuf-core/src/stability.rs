//! Stable-bit masks and unstable-bit selection.
//!
//! Two different selections live here and are kept separate:
//!
//! - [`stable_mask`] keeps positions whose flip rate is below a threshold.
//!   These are the reproducible bits used for identification.
//! - [`unstable_selection`] keeps positions whose 1-rate lies strictly inside
//!   `(θ, 1 - θ)`. These carry the most boot-to-boot entropy.

use serde::Serialize;

use crate::bits::BitSequence;
use crate::cohort::SampleCohort;
use crate::error::{PufError, Result};
use crate::stats::{STABLE_FLIP_RATE, flip_rate, per_bit_rate};

/// Default threshold for both selections.
pub const DEFAULT_THRESHOLD: f64 = STABLE_FLIP_RATE;

/// Boolean mask over the `L` positions of a cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BitMask {
    mask: Vec<bool>,
}

impl BitMask {
    pub fn new(mask: Vec<bool>) -> Self {
        Self { mask }
    }

    pub fn len(&self) -> usize {
        self.mask.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mask.is_empty()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.mask
    }

    /// Number of selected positions.
    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }

    /// Selected positions in ascending order.
    pub fn indices(&self) -> Vec<usize> {
        self.mask
            .iter()
            .enumerate()
            .filter_map(|(i, &m)| m.then_some(i))
            .collect()
    }

    /// The complementary partition.
    pub fn complement(&self) -> Self {
        Self::new(self.mask.iter().map(|m| !m).collect())
    }

    /// Bits of `seq` at the selected positions, in order.
    pub fn extract(&self, seq: &BitSequence) -> Result<BitSequence> {
        if seq.len() != self.len() {
            return Err(PufError::LengthMismatch {
                expected: self.len(),
                actual: seq.len(),
            });
        }
        let picked: Vec<u8> = seq
            .iter()
            .zip(&self.mask)
            .filter_map(|(bit, &m)| m.then_some(bit))
            .collect();
        if picked.is_empty() {
            return Err(PufError::EmptySelection);
        }
        Ok(BitSequence::from_raw(picked))
    }

    /// Cohort restricted to the selected positions.
    pub fn extract_cohort(&self, cohort: &SampleCohort) -> Result<SampleCohort> {
        cohort.map_samples(|s| self.extract(s))
    }
}

/// Positions with `flip_rate[i] < threshold`.
pub fn stable_mask(flip_rates: &[f64], threshold: f64) -> BitMask {
    BitMask::new(flip_rates.iter().map(|&f| f < threshold).collect())
}

/// Positions with `threshold < rate[i] < 1 - threshold`.
pub fn unstable_selection(rates: &[f64], threshold: f64) -> BitMask {
    BitMask::new(
        rates
            .iter()
            .map(|&r| r > threshold && r < 1.0 - threshold)
            .collect(),
    )
}

/// Stable mask computed from a cohort's flip rates.
pub fn stable_mask_for(cohort: &SampleCohort, threshold: f64) -> BitMask {
    stable_mask(&flip_rate(cohort), threshold)
}

/// Unstable selection computed from a cohort's per-bit 1-rates.
pub fn unstable_selection_for(cohort: &SampleCohort, threshold: f64) -> BitMask {
    unstable_selection(&per_bit_rate(cohort), threshold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::decode_hex;

    #[test]
    fn stable_threshold_is_strict() {
        let mask = stable_mask(&[0.0, 0.099, 0.1, 0.5], 0.1);
        assert_eq!(mask.as_slice(), &[true, true, false, false]);
        assert_eq!(mask.indices(), vec![0, 1]);
        assert_eq!(mask.complement().indices(), vec![2, 3]);
    }

    #[test]
    fn unstable_bounds_are_strict() {
        let mask = unstable_selection(&[0.0, 0.1, 0.2, 0.5, 0.8, 0.9, 1.0], 0.1);
        assert_eq!(mask.indices(), vec![2, 3, 4]);
    }

    #[test]
    fn modes_differ_on_same_cohort() {
        // Position 0 flips in half the boots, position 1 is pinned to 1.
        let cohort = SampleCohort::from_sequences(
            "t",
            vec![
                decode_hex("C0").unwrap(),
                decode_hex("40").unwrap(),
                decode_hex("C0").unwrap(),
                decode_hex("40").unwrap(),
            ],
        )
        .unwrap();
        let stable = stable_mask_for(&cohort, DEFAULT_THRESHOLD);
        let unstable = unstable_selection_for(&cohort, DEFAULT_THRESHOLD);
        assert!(!stable.as_slice()[0]);
        assert!(stable.as_slice()[1]);
        assert_eq!(unstable.indices(), vec![0]);
    }

    #[test]
    fn extract_selected_bits() {
        let mask = BitMask::new(vec![true, false, false, true, false, false, false, true]);
        let seq = decode_hex("81").unwrap();
        assert_eq!(mask.extract(&seq).unwrap().as_slice(), &[1, 0, 1]);
    }

    #[test]
    fn extract_nothing_is_an_error() {
        let mask = BitMask::new(vec![false; 8]);
        assert!(matches!(
            mask.extract(&decode_hex("FF").unwrap()),
            Err(PufError::EmptySelection)
        ));
    }

    #[test]
    fn extract_checks_length() {
        let mask = BitMask::new(vec![true; 4]);
        assert!(matches!(
            mask.extract(&decode_hex("FF").unwrap()),
            Err(PufError::LengthMismatch { expected: 4, actual: 8 })
        ));
    }
}
