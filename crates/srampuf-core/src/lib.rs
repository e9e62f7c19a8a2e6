//! # srampuf-core
//!
//! **Certify and condition SRAM PUF power-up captures.**
//!
//! An SRAM cell settles into a preferred state at power-up. Capturing the same
//! memory region over many boots gives a cohort of noisy, mostly reproducible
//! bit sequences per device. This crate turns those captures into quality
//! metrics (bit balance, flip rate, intra- and inter-device Hamming distance)
//! and conditioned outputs (a majority-vote fingerprint with its SHA-256
//! digest, stable/unstable bit masks, a deterministic XOR debias mask).
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use srampuf_core::{AnalysisConfig, SampleCohort, analyze_pair, load_directory};
//!
//! let card1 = SampleCohort::from_captures("Card 1", load_directory(Path::new("data/card1"))?)?;
//! let card2 = SampleCohort::from_captures("Card 2", load_directory(Path::new("data/card2"))?)?;
//!
//! let report = analyze_pair(&card1, &card2, &AnalysisConfig::default())?;
//! println!("mean inter-HD: {:.4}", report.inter_distance.mean);
//! # Ok::<(), srampuf_core::PufError>(())
//! ```
//!
//! ## Architecture
//!
//! Capture text → decode → cohort → statistics / distances → fingerprint,
//! stability masks, XOR debias → reports and persisted arrays
//!
//! Every derived vector is a pure function of the cohort it was computed
//! from. Cohorts are immutable; recompute rather than patch.

pub mod bits;
pub mod capture;
pub mod cohort;
pub mod debias;
pub mod distance;
pub mod error;
pub mod fingerprint;
pub mod persist;
pub mod report;
pub mod stability;
pub mod stats;

pub use bits::{BitSequence, decode_hex, decode_hex_bytes};
pub use capture::{Capture, CleanSummary, clean_capture, clean_directory, load_directory};
pub use cohort::SampleCohort;
pub use debias::{DebiasConfig, DebiasOutcome, XorMask};
pub use distance::{distance, distance_to_reference, inter_distances, intra_distances};
pub use error::{PufError, Result};
pub use fingerprint::Fingerprint;
pub use persist::{ArtifactKind, artifact_path, device_slug};
pub use report::{
    AnalysisConfig, CohortMetrics, DebiasReport, DeviceReport, PairReport, UnstableReport,
    analyze_device, analyze_pair,
};
pub use stability::{BitMask, stable_mask, unstable_selection};
pub use stats::{
    BitBalanceReport, FlipRateReport, Summary, flip_rate, global_rate, hamming_weight,
    hamming_weights, majority, per_bit_rate,
};

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
