use std::path::Path;

use srampuf_core::persist::save_stable_mask;
use srampuf_core::{FlipRateReport, Result, flip_rate, stable_mask};

use crate::DeviceArgs;

pub fn run(args: &DeviceArgs, threshold: f64, out: Option<&Path>) -> Result<()> {
    super::print_header("SRAM PUF Per-bit Stability (Flip Rate) Analysis");
    let cohorts = super::load_cohorts(args)?;

    for cohort in &cohorts {
        let rates = flip_rate(cohort);
        let r = FlipRateReport::from_flip_rates(cohort.len(), &rates);
        let mask = stable_mask(&rates, threshold);

        println!("{}:", cohort.label());
        println!("  Flip rate:              {}", super::format_summary(&r.flip_rate));
        println!(
            "  Perfectly stable (0%):  {} ({:.1}%)",
            r.perfectly_stable,
            super::percent(r.perfectly_stable, r.bits)
        );
        println!(
            "  Very stable (<5%):      {} ({:.1}%)",
            r.very_stable,
            super::percent(r.very_stable, r.bits)
        );
        println!(
            "  Stable (<10%):          {} ({:.1}%)",
            r.stable,
            super::percent(r.stable, r.bits)
        );
        println!(
            "  Unstable (>=10%):       {} ({:.1}%)",
            r.unstable,
            super::percent(r.unstable, r.bits)
        );
        println!(
            "  Mask (flip rate < {threshold}): {} bits kept",
            mask.count()
        );

        if let Some(dir) = out {
            let path = save_stable_mask(dir, cohort.label(), &mask)?;
            println!("  Stable mask saved: {}", path.display());
        }
        println!();
    }
    Ok(())
}
