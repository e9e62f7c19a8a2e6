//! Sample cohorts: the repeated boot captures of one physical device.
//!
//! Every member of a cohort has the same length `L`, the minimum observed
//! length at construction. When cohorts are compared they are aligned to the
//! minimum across all of them; alignment is strict prefix truncation.

use log::debug;

use crate::bits::BitSequence;
use crate::capture::Capture;
use crate::error::{PufError, Result};

/// Ordered, equal-length, non-empty set of samples from one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCohort {
    label: String,
    ids: Vec<String>,
    samples: Vec<BitSequence>,
}

impl SampleCohort {
    /// Build a cohort, truncating every sample to the shortest one.
    pub fn new(label: impl Into<String>, samples: Vec<(String, BitSequence)>) -> Result<Self> {
        let label = label.into();
        let Some(min_len) = samples.iter().map(|(_, s)| s.len()).min() else {
            return Err(PufError::EmptyCohort { device: label });
        };
        let mut ids = Vec::with_capacity(samples.len());
        let mut seqs = Vec::with_capacity(samples.len());
        for (id, seq) in samples {
            ids.push(id);
            seqs.push(seq.truncated(min_len)?);
        }
        debug!("cohort '{label}': {} samples x {min_len} bits", seqs.len());
        Ok(Self {
            label,
            ids,
            samples: seqs,
        })
    }

    /// Build a cohort from anonymous sequences, numbering them from 1.
    pub fn from_sequences(label: impl Into<String>, samples: Vec<BitSequence>) -> Result<Self> {
        let numbered = samples
            .into_iter()
            .enumerate()
            .map(|(i, s)| ((i + 1).to_string(), s))
            .collect();
        Self::new(label, numbered)
    }

    /// Build a cohort from loaded captures, keeping their ids.
    pub fn from_captures(label: impl Into<String>, captures: Vec<Capture>) -> Result<Self> {
        Self::new(label, captures.into_iter().map(|c| (c.id, c.bits)).collect())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn samples(&self) -> &[BitSequence] {
        &self.samples
    }

    /// Number of samples (always at least one).
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Common length `L` of every member.
    pub fn bit_len(&self) -> usize {
        self.samples[0].len()
    }

    /// Copy of this cohort truncated to `len` bits (no-op if already shorter).
    pub fn truncated(&self, len: usize) -> Result<Self> {
        let samples = self
            .samples
            .iter()
            .map(|s| s.truncated(len))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            label: self.label.clone(),
            ids: self.ids.clone(),
            samples,
        })
    }

    /// Same cohort with every member replaced by `f(member)`.
    pub fn map_samples<F>(&self, mut f: F) -> Result<Self>
    where
        F: FnMut(&BitSequence) -> Result<BitSequence>,
    {
        let samples = self.samples.iter().map(&mut f).collect::<Result<Vec<_>>>()?;
        Self::new(
            self.label.clone(),
            self.ids.iter().cloned().zip(samples).collect(),
        )
    }

    /// Align two cohorts to `min(L_a, L_b)`.
    pub fn align(a: &SampleCohort, b: &SampleCohort) -> Result<(SampleCohort, SampleCohort)> {
        let len = a.bit_len().min(b.bit_len());
        Ok((a.truncated(len)?, b.truncated(len)?))
    }

    /// Align any number of cohorts to the shortest common length.
    pub fn align_all(cohorts: &[SampleCohort]) -> Result<Vec<SampleCohort>> {
        let Some(len) = cohorts.iter().map(SampleCohort::bit_len).min() else {
            return Ok(Vec::new());
        };
        cohorts.iter().map(|c| c.truncated(len)).collect()
    }
}
