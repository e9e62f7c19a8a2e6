use std::path::Path;

use srampuf_core::persist::save_fingerprint;
use srampuf_core::{Fingerprint, Result};

use crate::DeviceArgs;

pub fn run(args: &DeviceArgs, preview_bytes: usize, out: Option<&Path>) -> Result<()> {
    super::print_header("SRAM PUF Representative Fingerprint Generator");
    let cohorts = super::load_cohorts(args)?;

    println!("Computing fingerprints (majority voting)...");
    let fingerprints: Vec<Fingerprint> = cohorts.iter().map(Fingerprint::from_cohort).collect();

    for fp in &fingerprints {
        println!("\n{} Fingerprint:", fp.label());
        println!("  SHA-256: {}", fp.digest_hex());
        println!(
            "  First {preview_bytes} bytes (hex):\n{}",
            fp.hex_preview(preview_bytes)
        );
        if let Some(dir) = out {
            let path = save_fingerprint(dir, fp)?;
            println!("  Saved: {}", path.display());
        }
    }

    if let [a, b] = fingerprints.as_slice() {
        println!();
        println!("Fingerprint Hamming Distance: {:.4}", a.distance_to(b)?);
    }
    Ok(())
}
