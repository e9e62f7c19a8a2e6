use std::path::Path;

use srampuf_core::{Result, SampleCohort, Summary, inter_distances, intra_distances};

use crate::DeviceArgs;

pub fn run_intra(args: &DeviceArgs) -> Result<()> {
    super::print_header("SRAM PUF Intra-Hamming Distance Analysis");
    let cohorts = super::load_cohorts(args)?;

    for cohort in &cohorts {
        let d = intra_distances(cohort)?;
        match Summary::of(&d) {
            Some(s) => println!(
                "{} Intra-HD ({} pairs): {}  (Ideal: 0)",
                cohort.label(),
                s.count,
                super::format_summary(&s)
            ),
            None => println!("{}: single sample, no pairs to compare", cohort.label()),
        }
    }
    Ok(())
}

pub fn run_inter(dir_a: &Path, dir_b: &Path, labels: &[String]) -> Result<()> {
    super::print_header("Inter-Hamming Distance Analysis");
    println!("Loading samples...");
    let a = super::load_cohort(dir_a, &super::device_label(labels, 0))?;
    let b = super::load_cohort(dir_b, &super::device_label(labels, 1))?;
    let (a, b) = SampleCohort::align(&a, &b)?;
    println!("  Using {} bits per sample\n", a.bit_len());

    let d = inter_distances(&a, &b)?;
    let s = Summary::of(&d).unwrap_or_default();
    println!("{} vs {} ({} pairs):", a.label(), b.label(), s.count);
    println!("  Mean Inter-HD: {:.4}", s.mean);
    println!("  Std Dev:       {:.4}", s.std_dev);
    println!("  Min:           {:.4}", s.min);
    println!("  Max:           {:.4}", s.max);
    println!("  Ideal:         0.5");
    Ok(())
}
