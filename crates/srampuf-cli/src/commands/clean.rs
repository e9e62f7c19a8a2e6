use std::path::Path;

use srampuf_core::Result;
use srampuf_core::clean_directory;

pub fn run(dir: &Path) -> Result<()> {
    println!("Cleaning files in: {}\n", dir.display());
    let summary = clean_directory(dir)?;
    println!(
        "Done! Cleaned {} files, skipped {} files.",
        summary.cleaned, summary.skipped
    );
    Ok(())
}
