//! Capture files: garbage stripping and ordered directory loading.
//!
//! A device directory holds one text file per power-up capture. Files whose
//! names are plain integers are ordered numerically; any other name sorts as
//! if it were `0`, ties broken by name. Cohort statistics do not depend on this
//! order, but sample ids in reports do.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::bits::{BitSequence, decode_hex};
use crate::error::{PufError, Result};

/// Extensions of helper files that live next to captures and are never data.
const IGNORED_EXTENSIONS: [&str; 3] = ["py", "c", "md"];

/// One decoded capture and the identifier it was loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub id: String,
    pub bits: BitSequence,
}

/// Outcome of cleaning a directory in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub cleaned: usize,
    pub skipped: usize,
}

/// Return the capture text starting at the first run of four space-separated
/// hex pairs (`XX XX XX XX`), or `None` if no such run exists.
pub fn clean_capture(text: &str) -> Option<&str> {
    const RUN: usize = 11;
    let bytes = text.as_bytes();
    if bytes.len() < RUN {
        return None;
    }
    (0..=bytes.len() - RUN)
        .find(|&start| is_hex_run(&bytes[start..start + RUN]))
        .map(|start| &text[start..])
}

fn is_hex_run(window: &[u8]) -> bool {
    window.iter().enumerate().all(|(i, &b)| {
        if i % 3 == 2 {
            b == b' '
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

fn is_ignored(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IGNORED_EXTENSIONS.contains(&e))
}

/// Capture files in `dir`, in load order.
pub fn list_capture_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| PufError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PufError::io(dir, e))?;
        let path = entry.path();
        if path.is_file() && !is_ignored(&path) {
            files.push(path);
        }
    }
    files.sort_by_cached_key(|p| {
        let name = p
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let order = name.parse::<u64>().unwrap_or(0);
        (order, name)
    });
    Ok(files)
}

/// Strip leading garbage from every capture in `dir`, rewriting files in place.
pub fn clean_directory(dir: &Path) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();
    for path in list_capture_files(dir)? {
        let raw = fs::read(&path).map_err(|e| PufError::io(&path, e))?;
        let text = String::from_utf8_lossy(&raw);
        match clean_capture(&text) {
            Some(clean) => {
                fs::write(&path, clean).map_err(|e| PufError::io(&path, e))?;
                summary.cleaned += 1;
            }
            None => {
                warn!("{}: no hex run found, left untouched", path.display());
                summary.skipped += 1;
            }
        }
    }
    info!(
        "cleaned {} file(s), skipped {} in {}",
        summary.cleaned,
        summary.skipped,
        dir.display()
    );
    Ok(summary)
}

/// Read and decode a single capture file.
pub fn load_capture(path: &Path) -> Result<BitSequence> {
    let raw = fs::read(path).map_err(|e| PufError::io(path, e))?;
    decode_hex(&String::from_utf8_lossy(&raw))
}

/// Load every decodable capture in `dir`.
///
/// Captures that decode to zero bits are logged and skipped; I/O failures
/// abort. An empty result is returned as-is: building a cohort from it is
/// what fails.
pub fn load_directory(dir: &Path) -> Result<Vec<Capture>> {
    let mut captures = Vec::new();
    for path in list_capture_files(dir)? {
        let id = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match load_capture(&path) {
            Ok(bits) => captures.push(Capture { id, bits }),
            Err(PufError::Decode) => warn!("{}: no decodable bytes, skipped", path.display()),
            Err(e) => return Err(e),
        }
    }
    debug!("loaded {} capture(s) from {}", captures.len(), dir.display());
    Ok(captures)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_finds_first_run() {
        let text = "boot> \x07garbage 1 2 AA BB CC DD EE";
        assert_eq!(clean_capture(text), Some("AA BB CC DD EE"));
    }

    #[test]
    fn clean_requires_four_pairs() {
        assert_eq!(clean_capture("AA BB CC"), None);
        assert_eq!(clean_capture("AA BB CC DZ"), None);
        assert_eq!(clean_capture("AA BB CC dd"), Some("AA BB CC dd"));
    }

    #[test]
    fn numeric_names_sort_numerically() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["10", "2", "1", "notes.md", "helper.py"] {
            fs::write(tmp.path().join(name), "FF 00").unwrap();
        }
        let names: Vec<String> = list_capture_files(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1", "2", "10"]);
    }

    #[test]
    fn load_skips_undecodable_captures() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("1"), "AA BB").unwrap();
        fs::write(tmp.path().join("2"), "zz").unwrap();
        fs::write(tmp.path().join("3"), "0F").unwrap();
        let caps = load_directory(tmp.path()).unwrap();
        let ids: Vec<&str> = caps.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(caps[0].bits.len(), 16);
    }

    #[test]
    fn load_missing_directory_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_directory(&tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, PufError::Io { .. }));
    }

    #[test]
    fn clean_directory_rewrites_in_place() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("1"), "xx\u{0}AA BB CC DD").unwrap();
        fs::write(tmp.path().join("2"), "no data here").unwrap();
        let summary = clean_directory(tmp.path()).unwrap();
        assert_eq!(summary, CleanSummary { cleaned: 1, skipped: 1 });
        assert_eq!(
            fs::read_to_string(tmp.path().join("1")).unwrap(),
            "AA BB CC DD"
        );
        assert_eq!(
            fs::read_to_string(tmp.path().join("2")).unwrap(),
            "no data here"
        );
    }
}
