use std::path::Path;

use srampuf_core::persist::save_xor_mask;
use srampuf_core::{
    CohortMetrics, DebiasConfig, Result, SampleCohort, Summary, XorMask, inter_distances,
};

use crate::DeviceArgs;

pub fn run(args: &DeviceArgs, seed: u64, out: Option<&Path>) -> Result<()> {
    super::print_header("SRAM PUF Analysis with XOR Debiasing");
    let cohorts = super::load_cohorts(args)?;
    let config = DebiasConfig {
        seed,
        ..DebiasConfig::default()
    };

    println!("Creating XOR masks (seed {seed})...\n");
    let mut debiased: Vec<SampleCohort> = Vec::with_capacity(cohorts.len());
    for cohort in &cohorts {
        let outcome = XorMask::build(cohort, &config);
        let after = outcome.mask.apply_cohort(cohort)?;
        let m_before = CohortMetrics::measure(cohort)?;
        let m_after = CohortMetrics::measure(&after)?;

        println!("{}:", cohort.label());
        println!(
            "  Hamming Weight: {:.4} -> {:.4}  (Target: 0.5)",
            m_before.hamming_weight.mean, m_after.hamming_weight.mean
        );
        println!(
            "  Intra-HD:       {} -> {}  (Target: 0)",
            super::intra_mean(&m_before),
            super::intra_mean(&m_after)
        );
        println!(
            "  Flipped {} of {} requested bits ({} stable-zero eligible)",
            outcome.flipped, outcome.requested, outcome.eligible
        );
        if outcome.shortfall() > 0 {
            println!(
                "  Partial correction: {} flips short of the target",
                outcome.shortfall()
            );
        }
        if let Some(dir) = out {
            let path = save_xor_mask(dir, cohort.label(), &outcome.mask)?;
            println!("  XOR mask saved: {}", path.display());
        }
        println!();
        debiased.push(after);
    }

    if let ([a, b], [a_xor, b_xor]) = (cohorts.as_slice(), debiased.as_slice()) {
        let before = Summary::of(&inter_distances(a, b)?).unwrap_or_default();
        let after = Summary::of(&inter_distances(a_xor, b_xor)?).unwrap_or_default();
        println!("Inter-HD BEFORE XOR: {:.4}", before.mean);
        println!("Inter-HD AFTER XOR:  {:.4}", after.mean);
        println!("Ideal:               0.5");
        println!("Improvement:         {:.4}", after.mean - before.mean);
    }
    Ok(())
}
