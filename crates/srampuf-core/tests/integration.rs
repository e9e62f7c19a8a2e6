//! Integration tests for srampuf-core.
//!
//! These tests drive the full pipeline from capture files on disk:
//! clean → load → cohort → statistics → fingerprint / masks → persistence.

use std::fs;
use std::path::Path;

use srampuf_core::persist::{load_fingerprint, load_stable_mask, save_fingerprint, save_stable_mask};
use srampuf_core::stability::stable_mask_for;
use srampuf_core::{
    AnalysisConfig, DebiasConfig, Fingerprint, PufError, SampleCohort, XorMask, analyze_pair,
    clean_directory, global_rate, inter_distances, intra_distances, load_directory,
};

/// Write `captures` as files named 1..=n, each wrapped in serial-console noise.
fn write_device(dir: &Path, captures: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for (i, hex) in captures.iter().enumerate() {
        let noisy = format!("U-Boot> md.b 0x20000000\r\n{hex}\r\n");
        fs::write(dir.join((i + 1).to_string()), noisy).unwrap();
    }
    fs::write(dir.join("dump.py"), "print('not a capture')").unwrap();
}

fn card1() -> Vec<&'static str> {
    vec![
        "A5 00 3C 00 FF 00 10 00",
        "A5 00 3C 00 FF 00 10 00",
        "A4 00 3C 00 FF 00 10 00",
        "A5 00 3D 00 FF 00 10 00",
    ]
}

fn card2() -> Vec<&'static str> {
    vec![
        "5A 00 C3 00 00 FF 01 00 99",
        "5A 00 C3 00 00 FF 01 00 99",
        "5B 00 C3 00 00 FF 01 00 99",
    ]
}

#[test]
fn end_to_end_two_devices() {
    let tmp = tempfile::tempdir().unwrap();
    let d1 = tmp.path().join("card1");
    let d2 = tmp.path().join("card2");
    write_device(&d1, &card1());
    write_device(&d2, &card2());

    assert_eq!(clean_directory(&d1).unwrap().cleaned, 4);
    assert_eq!(clean_directory(&d2).unwrap().cleaned, 3);

    let a = SampleCohort::from_captures("Card 1", load_directory(&d1).unwrap()).unwrap();
    let b = SampleCohort::from_captures("Card 2", load_directory(&d2).unwrap()).unwrap();
    assert_eq!(a.len(), 4);
    assert_eq!(b.len(), 3);
    assert_eq!(b.bit_len(), 72);

    let (a, b) = SampleCohort::align(&a, &b).unwrap();
    assert_eq!(a.bit_len(), 64);
    assert_eq!(b.bit_len(), 64);

    assert_eq!(intra_distances(&a).unwrap().len(), 6);
    assert_eq!(intra_distances(&b).unwrap().len(), 3);
    assert_eq!(inter_distances(&a, &b).unwrap().len(), 12);

    let report = analyze_pair(&a, &b, &AnalysisConfig::default()).unwrap();
    assert_eq!(report.bits, 64);
    assert!(report.inter_distance.mean > report.devices[0].all_bits.intra_distance.unwrap().mean);
    assert_eq!(report.devices[0].sample_ids, vec!["1", "2", "3", "4"]);
}

#[test]
fn empty_device_directory_fails_before_statistics() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("card3");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("1"), "no hex here").unwrap();

    let captures = load_directory(&dir).unwrap();
    assert!(captures.is_empty());
    let err = SampleCohort::from_captures("Card 3", captures).unwrap_err();
    assert!(matches!(err, PufError::EmptyCohort { ref device } if device == "Card 3"));
}

#[test]
fn persisted_artifacts_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("card1");
    let out = tmp.path().join("out");
    write_device(&src, &card1());
    clean_directory(&src).unwrap();

    let cohort = SampleCohort::from_captures("Card 1", load_directory(&src).unwrap()).unwrap();
    let fp = Fingerprint::from_cohort(&cohort);
    let mask = stable_mask_for(&cohort, 0.1);

    let fp_path = save_fingerprint(&out, &fp).unwrap();
    let mask_path = save_stable_mask(&out, "Card 1", &mask).unwrap();
    assert!(fp_path.ends_with("card_1_fingerprint.bin"));
    assert!(mask_path.ends_with("card_1_stable_mask.bin"));

    let fp2 = load_fingerprint(&out, "Card 1").unwrap();
    assert_eq!(fp2.digest_hex(), fp.digest_hex());
    assert_eq!(load_stable_mask(&out, "Card 1").unwrap(), mask);
}

#[test]
fn debias_moves_rate_toward_half_and_is_reproducible() {
    let cohort = SampleCohort::from_sequences(
        "Card 1",
        card1()
            .iter()
            .map(|h| srampuf_core::decode_hex(h).unwrap())
            .collect(),
    )
    .unwrap();
    let cfg = DebiasConfig::default();
    let first = XorMask::build(&cohort, &cfg);
    let second = XorMask::build(&cohort, &cfg);
    assert_eq!(first.mask, second.mask);

    let before = global_rate(&cohort);
    let after = global_rate(&first.mask.apply_cohort(&cohort).unwrap());
    assert!(before < 0.5);
    assert!((0.5 - after).abs() < (0.5 - before).abs());

    // XOR with a cohort-wide constant mask preserves pairwise distances.
    assert_eq!(
        intra_distances(&cohort).unwrap(),
        intra_distances(&first.mask.apply_cohort(&cohort).unwrap()).unwrap()
    );
}
