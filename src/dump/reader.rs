// file: src/dump/reader.rs
// version: 1.0.0
// guid: 4cb41e10-fcf4-4739-a2f9-1459e2e778cb

//! Materialize a dump from a directory or a zip archive

use super::{Dump, VERSION_FILE};
use crate::error::CompileDumpError;
use crate::Result;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// Open `source` as a dump. Directories are used as they are; archives are
/// extracted into `work_dir` unless a previous extraction is found there
/// and `override_existing` is false.
pub fn read_dump(source: &Path, work_dir: &Path, override_existing: bool) -> Result<Dump> {
    if source.is_dir() {
        debug!("Using dump directory: {}", source.display());
        return Ok(Dump::new(source));
    }

    let file = File::open(source).map_err(|e| {
        CompileDumpError::dump(format!("Failed to open dump {}: {}", source.display(), e))
    })?;
    let mut archive = ZipArchive::new(file)?;

    let marker = work_dir.join(VERSION_FILE);
    if override_existing || !marker.is_file() {
        info!(
            "Extracting {} into {}",
            source.display(),
            work_dir.display()
        );
        archive.extract(work_dir)?;
        if !marker.is_file() {
            return Err(CompileDumpError::dump(format!(
                "Did not extract into {}. Either the zip file is invalid or the dump is missing files",
                work_dir.display()
            )));
        }
    } else {
        info!("Reusing dump extracted in {}", work_dir.display());
    }

    Ok(Dump::new(work_dir))
}
