//! CLI for srampuf: certify and condition SRAM PUF captures.

mod commands;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "srampuf")]
#[command(about = "srampuf: SRAM PUF quality metrics, fingerprints and debiasing")]
#[command(version = srampuf_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// One or two device capture directories and their labels.
#[derive(Args, Clone)]
pub struct DeviceArgs {
    /// Capture directories, one per device
    #[arg(required = true, num_args = 1..=2)]
    dirs: Vec<PathBuf>,

    /// Device label, repeated per directory (default: "Card 1", "Card 2")
    #[arg(long = "label")]
    labels: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Strip leading garbage from every capture file in a directory (in place)
    Clean {
        /// Directory of raw capture files
        dir: PathBuf,
    },

    /// Global and per-bit 1-rate (bit balance) per device
    Balance {
        #[command(flatten)]
        devices: DeviceArgs,
    },

    /// Per-bit flip rate against the majority; writes stable-bit masks
    FlipRate {
        #[command(flatten)]
        devices: DeviceArgs,

        /// Flip rate below which a bit is stable
        #[arg(long, default_value = "0.1")]
        threshold: f64,

        /// Directory for <device>_stable_mask.bin
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Majority-vote fingerprint, SHA-256 digest and hex preview
    Fingerprint {
        #[command(flatten)]
        devices: DeviceArgs,

        /// Bytes shown in the hex preview
        #[arg(long, default_value = "64")]
        preview_bytes: usize,

        /// Directory for <device>_fingerprint.bin
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Intra-device Hamming distance (reproducibility)
    Intra {
        #[command(flatten)]
        devices: DeviceArgs,
    },

    /// Inter-device Hamming distance (uniqueness) between two devices
    Inter {
        /// First device capture directory
        dir_a: PathBuf,

        /// Second device capture directory
        dir_b: PathBuf,

        /// Device label, repeated per directory
        #[arg(long = "label")]
        labels: Vec<String>,
    },

    /// XOR debiasing: Hamming weight and distances before vs after
    Debias {
        #[command(flatten)]
        devices: DeviceArgs,

        /// Seed for selecting which stable-zero bits to flip
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Directory for <device>_xor_mask.bin
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Restrict to unstable (high-entropy) bits: all bits vs selection
    Unstable {
        #[command(flatten)]
        devices: DeviceArgs,

        /// Keep bits whose 1-rate is strictly inside (threshold, 1 - threshold)
        #[arg(long, default_value = "0.1")]
        threshold: f64,
    },

    /// Full analysis of one or two devices
    Analyze {
        #[command(flatten)]
        devices: DeviceArgs,

        /// Write the full report as JSON
        #[arg(long)]
        output: Option<PathBuf>,

        /// Debias seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Clean { dir } => commands::clean::run(&dir),
        Commands::Balance { devices } => commands::balance::run(&devices),
        Commands::FlipRate {
            devices,
            threshold,
            out,
        } => commands::flip_rate::run(&devices, threshold, out.as_deref()),
        Commands::Fingerprint {
            devices,
            preview_bytes,
            out,
        } => commands::fingerprint::run(&devices, preview_bytes, out.as_deref()),
        Commands::Intra { devices } => commands::distance::run_intra(&devices),
        Commands::Inter {
            dir_a,
            dir_b,
            labels,
        } => commands::distance::run_inter(&dir_a, &dir_b, &labels),
        Commands::Debias { devices, seed, out } => {
            commands::debias::run(&devices, seed, out.as_deref())
        }
        Commands::Unstable { devices, threshold } => commands::unstable::run(&devices, threshold),
        Commands::Analyze {
            devices,
            output,
            seed,
        } => commands::analyze::run(&devices, output.as_deref(), seed),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
