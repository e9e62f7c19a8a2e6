//! Fractional Hamming distances within and across devices.
//!
//! Intra-distance (same device) measures reproducibility and should sit near
//! 0. Inter-distance (different devices) measures uniqueness and should sit
//! near 0.5.

use crate::bits::BitSequence;
use crate::cohort::SampleCohort;
use crate::error::{PufError, Result};

/// Fraction of differing positions over the first `min(len a, len b)` bits.
pub fn distance(a: &BitSequence, b: &BitSequence) -> Result<f64> {
    distance_slices(a.as_slice(), b.as_slice())
}

fn distance_slices(a: &[u8], b: &[u8]) -> Result<f64> {
    let n = a.len().min(b.len());
    if n == 0 {
        return Err(PufError::DegenerateDistance);
    }
    let differing = a.iter().zip(b).take(n).filter(|(x, y)| x != y).count();
    Ok(differing as f64 / n as f64)
}

/// Distance for every unordered pair `(i, j)` with `i < j`, in that order.
pub fn intra_distances(cohort: &SampleCohort) -> Result<Vec<f64>> {
    let samples = cohort.samples();
    let n = samples.len();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(distance(&samples[i], &samples[j])?);
        }
    }
    Ok(out)
}

/// Distance for every `(a_i, b_j)`, row-major over `a`.
pub fn inter_distances(a: &SampleCohort, b: &SampleCohort) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(a.len() * b.len());
    for sa in a.samples() {
        for sb in b.samples() {
            out.push(distance(sa, sb)?);
        }
    }
    Ok(out)
}

/// Distance from each member to a reference sequence such as the majority.
pub fn distance_to_reference(cohort: &SampleCohort, reference: &BitSequence) -> Result<Vec<f64>> {
    cohort
        .samples()
        .iter()
        .map(|s| distance(s, reference))
        .collect()
}
