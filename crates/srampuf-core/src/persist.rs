//! Flat binary persistence for fingerprints and masks.
//!
//! # Storage Format
//!
//! One byte per position, value `0` or `1`, no header. Files are named after
//! the device slug:
//! - `<slug>_fingerprint.bin`: majority fingerprint
//! - `<slug>_stable_mask.bin`: stable-bit mask
//! - `<slug>_xor_mask.bin`: debias XOR mask

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::bits::BitSequence;
use crate::debias::XorMask;
use crate::error::{PufError, Result};
use crate::fingerprint::Fingerprint;
use crate::stability::BitMask;

/// Kind of persisted array, which determines the file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Fingerprint,
    StableMask,
    XorMask,
}

impl ArtifactKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Fingerprint => "fingerprint",
            Self::StableMask => "stable_mask",
            Self::XorMask => "xor_mask",
        }
    }
}

/// Lower-cased device label with spaces replaced by underscores.
pub fn device_slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Path of an artifact for `label` inside `dir`.
pub fn artifact_path(dir: &Path, label: &str, kind: ArtifactKind) -> PathBuf {
    dir.join(format!("{}_{}.bin", device_slug(label), kind.suffix()))
}

fn write_raw(path: &Path, values: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PufError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| PufError::io(path, e))?;
    let mut w = BufWriter::new(file);
    w.write_all(values).map_err(|e| PufError::io(path, e))?;
    w.flush().map_err(|e| PufError::io(path, e))?;
    info!("saved {} ({} positions)", path.display(), values.len());
    Ok(())
}

fn read_raw(path: &Path) -> Result<Vec<u8>> {
    let values = fs::read(path).map_err(|e| PufError::io(path, e))?;
    if let Some((offset, &value)) = values.iter().enumerate().find(|&(_, &b)| b > 1) {
        return Err(PufError::InvalidMaskByte { value, offset });
    }
    Ok(values)
}

pub fn save_fingerprint(dir: &Path, fp: &Fingerprint) -> Result<PathBuf> {
    let path = artifact_path(dir, fp.label(), ArtifactKind::Fingerprint);
    write_raw(&path, fp.bits().as_slice())?;
    Ok(path)
}

pub fn load_fingerprint(dir: &Path, label: &str) -> Result<Fingerprint> {
    let path = artifact_path(dir, label, ArtifactKind::Fingerprint);
    let bits = BitSequence::from_bits(read_raw(&path)?)?;
    Ok(Fingerprint::from_bits(label, bits))
}

pub fn save_stable_mask(dir: &Path, label: &str, mask: &BitMask) -> Result<PathBuf> {
    let path = artifact_path(dir, label, ArtifactKind::StableMask);
    let values: Vec<u8> = mask.as_slice().iter().map(|&m| u8::from(m)).collect();
    write_raw(&path, &values)?;
    Ok(path)
}

pub fn load_stable_mask(dir: &Path, label: &str) -> Result<BitMask> {
    let path = artifact_path(dir, label, ArtifactKind::StableMask);
    Ok(BitMask::new(
        read_raw(&path)?.into_iter().map(|b| b == 1).collect(),
    ))
}

pub fn save_xor_mask(dir: &Path, label: &str, mask: &XorMask) -> Result<PathBuf> {
    let path = artifact_path(dir, label, ArtifactKind::XorMask);
    write_raw(&path, mask.as_slice())?;
    Ok(path)
}

pub fn load_xor_mask(dir: &Path, label: &str) -> Result<XorMask> {
    let path = artifact_path(dir, label, ArtifactKind::XorMask);
    XorMask::from_bits(read_raw(&path)?)
}
