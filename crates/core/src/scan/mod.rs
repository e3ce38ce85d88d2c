//! Parallel scanning of candidate library files.
//!
//! Extraction of independent files shares no mutable state, so it fans out
//! across a rayon pool. Results are collected **in input order** regardless
//! of completion order: scan order is what keeps every downstream stage
//! (index, disambiguation, sorting) deterministic across runs.
//!
//! Index build, graph build, and the sort itself stay single-threaded over
//! the complete scan set; no resolution decision is safe until every
//! library's symbols are known.

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::extract::{extract_library, ExtractError};
use crate::model::LibraryScan;

/// Policy knobs for a scan pass.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Abort on the first per-library failure (in input order) instead of
    /// collecting failures and continuing with the healthy libraries.
    pub fail_fast: bool,
    /// Mark every scanned library as a system library.
    pub system: bool,
}

/// A per-library failure, kept alongside the successful scans.
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Everything a scan pass produced: successful per-library scans in input
/// order, plus the failures that were skipped over.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub scans: Vec<LibraryScan>,
    pub failures: Vec<ScanFailure>,
}

/// Scan `paths` in parallel and collect per-library results.
///
/// With `fail_fast`, the first failure in input order is returned as the
/// overall error; otherwise failures land in `ScanOutcome::failures` and
/// the run continues with whatever extracted cleanly. Either way the
/// successful scans keep the order of `paths`.
pub fn scan_libraries(
    paths: &[PathBuf],
    options: &ScanOptions,
) -> Result<ScanOutcome, ExtractError> {
    let results: Vec<Result<LibraryScan, ExtractError>> = paths
        .par_iter()
        .map(|path| scan_one(path, options))
        .collect();

    let mut outcome = ScanOutcome::default();
    for (path, result) in paths.iter().zip(results) {
        match result {
            Ok(scan) => outcome.scans.push(scan),
            Err(error) if options.fail_fast => return Err(error),
            Err(error) => {
                log::warn!("skipping {}: {error}", path.display());
                outcome.failures.push(ScanFailure { path: path.clone(), error });
            }
        }
    }
    Ok(outcome)
}

fn scan_one(path: &Path, options: &ScanOptions) -> Result<LibraryScan, ExtractError> {
    let mut scan = extract_library(path)?;
    if options.system {
        scan.library.system = true;
    }
    Ok(scan)
}
