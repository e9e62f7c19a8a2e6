use std::path::Path;

use srampuf_core::{
    AnalysisConfig, DebiasConfig, DeviceReport, PufError, Result, analyze_device, analyze_pair,
};

use crate::DeviceArgs;

fn print_device(r: &DeviceReport) {
    println!("{} ({} samples, {} bits)", r.label, r.samples, r.all_bits.bits);
    println!("  Global 1-rate:        {:.4}", r.balance.global_rate);
    println!(
        "  Hamming weight:       {}",
        super::format_summary(&r.all_bits.hamming_weight)
    );
    match &r.all_bits.intra_distance {
        Some(s) => println!("  Intra-HD:             {}", super::format_summary(s)),
        None => println!("  Intra-HD:             n/a (single sample)"),
    }
    println!(
        "  Stable bits:          {} ({:.1}%)",
        r.stable_bits,
        super::percent(r.stable_bits, r.all_bits.bits)
    );
    println!(
        "  Unstable selection:   {} ({:.1}%)",
        r.unstable.selected,
        super::percent(r.unstable.selected, r.all_bits.bits)
    );
    println!(
        "  Debias:               {:.4} -> {:.4} ({} flips, shortfall {})",
        r.debias.rate_before, r.debias.rate_after, r.debias.flipped, r.debias.shortfall
    );
    println!("  Fingerprint SHA-256:  {}", r.fingerprint_sha256);
    println!();
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| PufError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    println!("Results written to {}", path.display());
    Ok(())
}

pub fn run(args: &DeviceArgs, output: Option<&Path>, seed: u64) -> Result<()> {
    super::print_header("SRAM PUF Full Analysis");
    let cohorts = super::load_cohorts(args)?;
    let config = AnalysisConfig {
        debias: DebiasConfig {
            seed,
            ..DebiasConfig::default()
        },
        ..AnalysisConfig::default()
    };

    match cohorts.as_slice() {
        [a, b] => {
            let report = analyze_pair(a, b, &config)?;
            for device in &report.devices {
                print_device(device);
            }
            println!(
                "Inter-HD:             {}",
                super::format_summary(&report.inter_distance)
            );
            println!(
                "Inter-HD (debiased):  {}",
                super::format_summary(&report.inter_distance_debiased)
            );
            println!("Fingerprint distance: {:.4}", report.fingerprint_distance);
            if let Some(path) = output {
                write_json(path, &report)?;
            }
        }
        _ => {
            let reports = cohorts
                .iter()
                .map(|c| analyze_device(c, &config))
                .collect::<Result<Vec<_>>>()?;
            for r in &reports {
                print_device(r);
            }
            if let Some(path) = output {
                write_json(path, &reports)?;
            }
        }
    }
    Ok(())
}
