use srampuf_core::stability::unstable_selection_for;
use srampuf_core::{CohortMetrics, Result};

use crate::DeviceArgs;

pub fn run(args: &DeviceArgs, threshold: f64) -> Result<()> {
    super::print_header("SRAM PUF Analysis - Unstable Bits Method");
    let cohorts = super::load_cohorts(args)?;

    for cohort in &cohorts {
        let selection = unstable_selection_for(cohort, threshold);
        let total = cohort.bit_len();
        println!(
            "{} ({} unstable bits out of {}, {:.1}%):",
            cohort.label(),
            selection.count(),
            total,
            super::percent(selection.count(), total)
        );
        if selection.count() == 0 {
            println!("  No bit has a 1-rate inside ({threshold}, {}).\n", 1.0 - threshold);
            continue;
        }

        let all = CohortMetrics::measure(cohort)?;
        let only = CohortMetrics::measure(&selection.extract_cohort(cohort)?)?;
        println!(
            "  Hamming Weight: {:.4} -> {:.4}  (Target: 0.5)",
            all.hamming_weight.mean, only.hamming_weight.mean
        );
        println!(
            "  Intra-HD:       {} -> {}  (Target: 0)\n",
            super::intra_mean(&all),
            super::intra_mean(&only)
        );
    }
    Ok(())
}
