//! Composite analysis reports.
//!
//! A [`DeviceReport`] gathers every quality metric and conditioning result for
//! one cohort; a [`PairReport`] adds the cross-device uniqueness metrics for
//! two aligned cohorts. Reports are plain serializable data for the reporting
//! layer; nothing in them feeds back into the pipeline.

use serde::Serialize;

use crate::cohort::SampleCohort;
use crate::debias::{DebiasConfig, XorMask};
use crate::distance::{distance_to_reference, inter_distances, intra_distances};
use crate::error::Result;
use crate::fingerprint::{DEFAULT_PREVIEW_BYTES, Fingerprint};
use crate::stability::{DEFAULT_THRESHOLD, stable_mask, unstable_selection};
use crate::stats::{
    BitBalanceReport, FlipRateReport, Summary, flip_rate, hamming_weights, per_bit_rate,
};

/// Tunables for a full analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisConfig {
    /// Flip-rate threshold of the stable mask.
    pub stability_threshold: f64,
    /// 1-rate margin of the unstable-bit selection.
    pub unstable_threshold: f64,
    /// Bytes shown in the fingerprint hex preview.
    pub preview_bytes: usize,
    pub debias: DebiasConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            stability_threshold: DEFAULT_THRESHOLD,
            unstable_threshold: DEFAULT_THRESHOLD,
            preview_bytes: DEFAULT_PREVIEW_BYTES,
            debias: DebiasConfig::default(),
        }
    }
}

/// Hamming weight and intra-distance of one view of a cohort.
#[derive(Debug, Clone, Serialize)]
pub struct CohortMetrics {
    pub bits: usize,
    pub hamming_weight: Summary,
    /// `None` for single-sample cohorts, which have no pairs.
    pub intra_distance: Option<Summary>,
}

impl CohortMetrics {
    pub fn measure(cohort: &SampleCohort) -> Result<Self> {
        let weights = hamming_weights(cohort);
        let intra = intra_distances(cohort)?;
        Ok(Self {
            bits: cohort.bit_len(),
            hamming_weight: Summary::of(&weights).unwrap_or_default(),
            intra_distance: Summary::of(&intra),
        })
    }
}

/// Effect of the XOR debias mask on a cohort.
#[derive(Debug, Clone, Serialize)]
pub struct DebiasReport {
    pub rate_before: f64,
    pub rate_after: f64,
    pub eligible: usize,
    pub requested: usize,
    pub flipped: usize,
    pub shortfall: usize,
    pub after: CohortMetrics,
}

/// Metrics restricted to the unstable-bit selection.
#[derive(Debug, Clone, Serialize)]
pub struct UnstableReport {
    pub selected: usize,
    /// `None` when the selection is empty.
    pub metrics: Option<CohortMetrics>,
}

/// Everything computed for one device.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub label: String,
    pub samples: usize,
    pub sample_ids: Vec<String>,
    pub all_bits: CohortMetrics,
    pub balance: BitBalanceReport,
    pub flip_rate: FlipRateReport,
    pub stable_bits: usize,
    pub fingerprint_sha256: String,
    pub fingerprint_preview: String,
    /// Per-member distance to the fingerprint.
    pub distance_to_fingerprint: Summary,
    pub unstable: UnstableReport,
    pub debias: DebiasReport,
}

/// Two devices analyzed at a common length.
#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub bits: usize,
    pub devices: [DeviceReport; 2],
    pub inter_distance: Summary,
    pub inter_distance_debiased: Summary,
    pub fingerprint_distance: f64,
}

/// Analyze a single cohort.
pub fn analyze_device(cohort: &SampleCohort, config: &AnalysisConfig) -> Result<DeviceReport> {
    let rates = per_bit_rate(cohort);
    let flips = flip_rate(cohort);
    let fingerprint = Fingerprint::from_cohort(cohort);
    let to_fp = distance_to_reference(cohort, fingerprint.bits())?;

    let selection = unstable_selection(&rates, config.unstable_threshold);
    let unstable_metrics = if selection.count() > 0 {
        Some(CohortMetrics::measure(&selection.extract_cohort(cohort)?)?)
    } else {
        None
    };

    let outcome = XorMask::build(cohort, &config.debias);
    let debiased = outcome.mask.apply_cohort(cohort)?;

    Ok(DeviceReport {
        label: cohort.label().to_string(),
        samples: cohort.len(),
        sample_ids: cohort.ids().to_vec(),
        all_bits: CohortMetrics::measure(cohort)?,
        balance: BitBalanceReport::from_rates(cohort.len(), &rates),
        flip_rate: FlipRateReport::from_flip_rates(cohort.len(), &flips),
        stable_bits: stable_mask(&flips, config.stability_threshold).count(),
        fingerprint_sha256: fingerprint.digest_hex(),
        fingerprint_preview: fingerprint.hex_preview(config.preview_bytes),
        distance_to_fingerprint: Summary::of(&to_fp).unwrap_or_default(),
        unstable: UnstableReport {
            selected: selection.count(),
            metrics: unstable_metrics,
        },
        debias: DebiasReport {
            rate_before: outcome.rate_before,
            rate_after: outcome.rate_after,
            eligible: outcome.eligible,
            requested: outcome.requested,
            flipped: outcome.flipped,
            shortfall: outcome.shortfall(),
            after: CohortMetrics::measure(&debiased)?,
        },
    })
}

/// Align two cohorts and analyze them together.
pub fn analyze_pair(
    a: &SampleCohort,
    b: &SampleCohort,
    config: &AnalysisConfig,
) -> Result<PairReport> {
    let (a, b) = SampleCohort::align(a, b)?;
    let inter = inter_distances(&a, &b)?;

    let a_xor = XorMask::build(&a, &config.debias).mask.apply_cohort(&a)?;
    let b_xor = XorMask::build(&b, &config.debias).mask.apply_cohort(&b)?;
    let inter_xor = inter_distances(&a_xor, &b_xor)?;

    let fp_distance = Fingerprint::from_cohort(&a).distance_to(&Fingerprint::from_cohort(&b))?;

    Ok(PairReport {
        bits: a.bit_len(),
        devices: [analyze_device(&a, config)?, analyze_device(&b, config)?],
        inter_distance: Summary::of(&inter).unwrap_or_default(),
        inter_distance_debiased: Summary::of(&inter_xor).unwrap_or_default(),
        fingerprint_distance: fp_distance,
    })
}
