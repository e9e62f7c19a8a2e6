//! Per-bit and per-sample statistics over a cohort.
//!
//! All rates are exact integer counts divided once in `f64`. Thresholds are
//! applied exactly as written at each call site: "balanced" is
//! `0.4 < rate < 0.6`, "stable" is `flip_rate < 0.1`.

use serde::Serialize;

use crate::bits::BitSequence;
use crate::cohort::SampleCohort;

/// Lower bound (exclusive) of a balanced per-bit 1-rate.
pub const BALANCED_LOW: f64 = 0.4;
/// Upper bound (exclusive) of a balanced per-bit 1-rate.
pub const BALANCED_HIGH: f64 = 0.6;
/// Flip rate below which a bit is "very stable".
pub const VERY_STABLE_FLIP_RATE: f64 = 0.05;
/// Flip rate below which a bit is "stable".
pub const STABLE_FLIP_RATE: f64 = 0.1;

// ---------------------------------------------------------------------------
// Core statistics
// ---------------------------------------------------------------------------

fn ones_per_position(cohort: &SampleCohort) -> Vec<usize> {
    let mut counts = vec![0usize; cohort.bit_len()];
    for sample in cohort.samples() {
        for (count, bit) in counts.iter_mut().zip(sample.iter()) {
            *count += bit as usize;
        }
    }
    counts
}

/// Fraction of cohort members equal to 1 at each position.
pub fn per_bit_rate(cohort: &SampleCohort) -> Vec<f64> {
    let n = cohort.len() as f64;
    ones_per_position(cohort)
        .into_iter()
        .map(|c| c as f64 / n)
        .collect()
}

/// Mean 1-rate over the whole flattened sample matrix.
pub fn global_rate(cohort: &SampleCohort) -> f64 {
    let ones: usize = ones_per_position(cohort).iter().sum();
    ones as f64 / (cohort.len() * cohort.bit_len()) as f64
}

/// Fraction of 1-bits in a single sequence.
pub fn hamming_weight(seq: &BitSequence) -> f64 {
    seq.count_ones() as f64 / seq.len() as f64
}

/// Hamming weight of every cohort member, in cohort order.
pub fn hamming_weights(cohort: &SampleCohort) -> Vec<f64> {
    cohort.samples().iter().map(hamming_weight).collect()
}

/// Majority vote per position; a 0.5 tie resolves to 1.
pub fn majority(cohort: &SampleCohort) -> BitSequence {
    majority_from_rates(&per_bit_rate(cohort))
}

pub(crate) fn majority_from_rates(rates: &[f64]) -> BitSequence {
    BitSequence::from_raw(rates.iter().map(|&r| u8::from(r >= 0.5)).collect())
}

/// Fraction of members disagreeing with the majority at each position.
pub fn flip_rate(cohort: &SampleCohort) -> Vec<f64> {
    let reference = majority(cohort);
    let mut flips = vec![0usize; cohort.bit_len()];
    for sample in cohort.samples() {
        for ((count, bit), expected) in flips.iter_mut().zip(sample.iter()).zip(reference.iter()) {
            *count += usize::from(bit != expected);
        }
    }
    let n = cohort.len() as f64;
    flips.into_iter().map(|c| c as f64 / n).collect()
}

// ---------------------------------------------------------------------------
// Summaries
// ---------------------------------------------------------------------------

/// Mean, population standard deviation and range of a set of values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Summary {
    /// Summarize `values`; `None` when empty.
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        })
    }
}

/// Global and per-position bit balance of one cohort.
#[derive(Debug, Clone, Serialize)]
pub struct BitBalanceReport {
    pub samples: usize,
    pub bits: usize,
    pub global_rate: f64,
    pub per_bit: Summary,
    pub always_zero: usize,
    pub always_one: usize,
    /// Positions with `0.4 < rate < 0.6`.
    pub balanced: usize,
}

impl BitBalanceReport {
    pub fn from_cohort(cohort: &SampleCohort) -> Self {
        Self::from_rates(cohort.len(), &per_bit_rate(cohort))
    }

    /// Build from precomputed per-bit rates of a cohort with `samples` members.
    pub fn from_rates(samples: usize, rates: &[f64]) -> Self {
        let per_bit = Summary::of(rates).unwrap_or_default();
        Self {
            samples,
            bits: rates.len(),
            global_rate: per_bit.mean,
            per_bit,
            always_zero: rates.iter().filter(|&&r| r == 0.0).count(),
            always_one: rates.iter().filter(|&&r| r == 1.0).count(),
            balanced: rates
                .iter()
                .filter(|&&r| r > BALANCED_LOW && r < BALANCED_HIGH)
                .count(),
        }
    }
}

/// Stability classes of a cohort's flip-rate vector.
#[derive(Debug, Clone, Serialize)]
pub struct FlipRateReport {
    pub samples: usize,
    pub bits: usize,
    pub flip_rate: Summary,
    pub perfectly_stable: usize,
    /// Flip rate `< 0.05`.
    pub very_stable: usize,
    /// Flip rate `< 0.1`.
    pub stable: usize,
    /// Flip rate `>= 0.1`.
    pub unstable: usize,
}

impl FlipRateReport {
    pub fn from_cohort(cohort: &SampleCohort) -> Self {
        Self::from_flip_rates(cohort.len(), &flip_rate(cohort))
    }

    pub fn from_flip_rates(samples: usize, rates: &[f64]) -> Self {
        let summary = Summary::of(rates).unwrap_or_default();
        let stable = rates.iter().filter(|&&r| r < STABLE_FLIP_RATE).count();
        Self {
            samples,
            bits: rates.len(),
            flip_rate: summary,
            perfectly_stable: rates.iter().filter(|&&r| r == 0.0).count(),
            very_stable: rates.iter().filter(|&&r| r < VERY_STABLE_FLIP_RATE).count(),
            stable,
            unstable: rates.len() - stable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::decode_hex;

    fn cohort(hex: &[&str]) -> SampleCohort {
        SampleCohort::from_sequences(
            "test",
            hex.iter().map(|h| decode_hex(h).unwrap()).collect(),
        )
        .unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn hamming_weight_extremes() {
        assert_eq!(hamming_weight(&decode_hex("00 00").unwrap()), 0.0);
        assert_eq!(hamming_weight(&decode_hex("FF FF").unwrap()), 1.0);
        assert_eq!(hamming_weight(&decode_hex("F0").unwrap()), 0.5);
    }

    #[test]
    fn three_member_scenario() {
        // Third member disagrees with the majority everywhere.
        let c = cohort(&["FF", "FF", "00"]);
        let rates = per_bit_rate(&c);
        assert!(rates.iter().all(|&r| close(r, 2.0 / 3.0)));
        assert_eq!(majority(&c).as_slice(), &[1; 8]);
        let flips = flip_rate(&c);
        assert!(flips.iter().all(|&f| close(f, 1.0 / 3.0)));
        assert!(close(global_rate(&c), 2.0 / 3.0));
    }

    #[test]
    fn scenario_with_one_mixed_position() {
        let c = cohort(&["FF", "FF", "FE"]);
        let rates = per_bit_rate(&c);
        assert_eq!(&rates[..7], &[1.0; 7]);
        assert!(close(rates[7], 2.0 / 3.0));
        assert_eq!(majority(&c).as_slice(), &[1; 8]);
        let flips = flip_rate(&c);
        assert_eq!(&flips[..7], &[0.0; 7]);
        assert!(close(flips[7], 1.0 / 3.0));
    }

    #[test]
    fn majority_tie_resolves_to_one() {
        let c = cohort(&["F0", "0F"]);
        assert_eq!(majority(&c).as_slice(), &[1; 8]);
    }

    #[test]
    fn majority_of_repeated_sequence_is_identity() {
        let c = cohort(&["A5 3C", "A5 3C", "A5 3C", "A5 3C"]);
        assert_eq!(majority(&c).to_packed_bytes(), vec![0xA5, 0x3C]);
    }

    #[test]
    fn singleton_cohort_never_flips() {
        let c = cohort(&["5A C3"]);
        assert!(flip_rate(&c).iter().all(|&f| f == 0.0));
    }

    #[test]
    fn statistics_are_order_invariant() {
        let a = cohort(&["12 34", "AB CD", "FF 00", "0F F0"]);
        let b = cohort(&["0F F0", "FF 00", "12 34", "AB CD"]);
        assert_eq!(per_bit_rate(&a), per_bit_rate(&b));
        assert_eq!(majority(&a), majority(&b));
        assert_eq!(flip_rate(&a), flip_rate(&b));
        assert_eq!(global_rate(&a), global_rate(&b));
    }

    #[test]
    fn global_rate_matches_mean_of_rates() {
        let c = cohort(&["12 34", "AB CD", "FF 00"]);
        let rates = per_bit_rate(&c);
        let mean = rates.iter().sum::<f64>() / rates.len() as f64;
        assert!(close(global_rate(&c), mean));
    }

    #[test]
    fn summary_population_std() {
        let s = Summary::of(&[0.0, 1.0]).unwrap();
        assert_eq!(s.mean, 0.5);
        assert_eq!(s.std_dev, 0.5);
        assert_eq!((s.min, s.max), (0.0, 1.0));
        assert!(Summary::of(&[]).is_none());
    }

    #[test]
    fn balance_report_counts() {
        // Positions: bit0 always 1, bits 1..3 always 0, bits 4..7 half.
        let c = cohort(&["8F", "80"]);
        let report = BitBalanceReport::from_cohort(&c);
        assert_eq!(report.samples, 2);
        assert_eq!(report.bits, 8);
        assert_eq!(report.always_one, 1);
        assert_eq!(report.always_zero, 3);
        assert_eq!(report.balanced, 4);
        assert!(close(report.global_rate, 3.0 / 8.0));
    }

    #[test]
    fn balance_bounds_are_strict() {
        let report = BitBalanceReport::from_rates(10, &[0.4, 0.6, 0.5, 0.41]);
        assert_eq!(report.balanced, 2);
    }

    #[test]
    fn flip_report_classes() {
        let report = FlipRateReport::from_flip_rates(20, &[0.0, 0.04, 0.05, 0.1, 0.3]);
        assert_eq!(report.perfectly_stable, 1);
        assert_eq!(report.very_stable, 2);
        assert_eq!(report.stable, 3);
        assert_eq!(report.unstable, 2);
    }
}
