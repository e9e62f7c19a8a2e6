pub mod analyze;
pub mod balance;
pub mod clean;
pub mod debias;
pub mod distance;
pub mod fingerprint;
pub mod flip_rate;
pub mod unstable;

use std::path::Path;

use srampuf_core::{CohortMetrics, Result, SampleCohort, Summary, load_directory};

use crate::DeviceArgs;

/// Label for the device at `index`: the user's `--label`, else "Card N".
pub fn device_label(labels: &[String], index: usize) -> String {
    labels
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("Card {}", index + 1))
}

/// Load one cohort from a capture directory.
pub fn load_cohort(dir: &Path, label: &str) -> Result<SampleCohort> {
    let captures = load_directory(dir)?;
    let cohort = SampleCohort::from_captures(label, captures)?;
    println!(
        "  {label}: {} samples from {}",
        cohort.len(),
        dir.display()
    );
    Ok(cohort)
}

/// Load every device and align them to the shortest common length.
pub fn load_cohorts(args: &DeviceArgs) -> Result<Vec<SampleCohort>> {
    println!("Loading samples...");
    let cohorts = args
        .dirs
        .iter()
        .enumerate()
        .map(|(i, dir)| load_cohort(dir, &device_label(&args.labels, i)))
        .collect::<Result<Vec<_>>>()?;
    let aligned = SampleCohort::align_all(&cohorts)?;
    if let Some(first) = aligned.first() {
        println!("  Using {} bits per sample\n", first.bit_len());
    }
    Ok(aligned)
}

/// One-line `mean / std / min / max` rendering.
pub fn format_summary(s: &Summary) -> String {
    format!(
        "mean {:.4}  std {:.4}  min {:.4}  max {:.4}",
        s.mean, s.std_dev, s.min, s.max
    )
}

/// Mean intra-distance, or `n/a` for single-sample cohorts.
pub fn intra_mean(m: &CohortMetrics) -> String {
    m.intra_distance
        .map(|s| format!("{:.4}", s.mean))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

pub fn print_header(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_labels() {
        assert_eq!(device_label(&[], 0), "Card 1");
        assert_eq!(device_label(&[], 1), "Card 2");
    }

    #[test]
    fn explicit_labels_win() {
        let labels = vec!["Board A".to_string()];
        assert_eq!(device_label(&labels, 0), "Board A");
        assert_eq!(device_label(&labels, 1), "Card 2");
    }

    #[test]
    fn percent_handles_zero_total() {
        assert_eq!(percent(1, 0), 0.0);
        assert_eq!(percent(1, 4), 25.0);
    }

    #[test]
    fn summary_line() {
        let s = Summary::of(&[0.25, 0.75]).unwrap();
        assert_eq!(
            format_summary(&s),
            "mean 0.5000  std 0.2500  min 0.2500  max 0.7500"
        );
    }

    #[test]
    fn load_cohorts_aligns_devices() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a");
        let b = tmp.path().join("b");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();
        std::fs::write(a.join("1"), "AA BB CC").unwrap();
        std::fs::write(b.join("1"), "11 22").unwrap();
        let args = DeviceArgs {
            dirs: vec![a, b],
            labels: Vec::new(),
        };
        let cohorts = load_cohorts(&args).unwrap();
        assert_eq!(cohorts.len(), 2);
        assert!(cohorts.iter().all(|c| c.bit_len() == 16));
        assert_eq!(cohorts[1].label(), "Card 2");
    }

    #[test]
    fn empty_directory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let args = DeviceArgs {
            dirs: vec![tmp.path().to_path_buf()],
            labels: Vec::new(),
        };
        assert!(load_cohorts(&args).is_err());
    }
}
