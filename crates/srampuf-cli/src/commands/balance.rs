use srampuf_core::{BitBalanceReport, Result};

use crate::DeviceArgs;

pub fn run(args: &DeviceArgs) -> Result<()> {
    super::print_header("SRAM PUF Bit Balance (Bit Weight) Analysis");
    let cohorts = super::load_cohorts(args)?;

    let reports: Vec<BitBalanceReport> =
        cohorts.iter().map(BitBalanceReport::from_cohort).collect();

    for (cohort, r) in cohorts.iter().zip(&reports) {
        println!("{}:", cohort.label());
        println!("  Total samples:          {}", r.samples);
        println!("  Total bits per sample:  {}", r.bits);
        println!("  Global 1-rate:          {:.4} (Ideal: 0.5)", r.global_rate);
        println!("  Per-bit 1-rate:         {}", super::format_summary(&r.per_bit));
        println!(
            "  Bits always 0:          {} ({:.1}%)",
            r.always_zero,
            super::percent(r.always_zero, r.bits)
        );
        println!(
            "  Bits always 1:          {} ({:.1}%)",
            r.always_one,
            super::percent(r.always_one, r.bits)
        );
        println!(
            "  Bits balanced (0.4-0.6): {} ({:.1}%)\n",
            r.balanced,
            super::percent(r.balanced, r.bits)
        );
    }
    Ok(())
}
