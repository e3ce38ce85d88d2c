use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use linkorder::collect_library_files;
use linkorder_core::cache::sha256_file;
use linkorder_core::scan::{scan_libraries, ScanOptions};

use super::util::load_cache;

/// Scan the given files/directories and update the cache.
pub fn run(
    cache_path: &Path,
    paths: &[PathBuf],
    force: bool,
    system: bool,
    fail_fast: bool,
) -> Result<()> {
    let mut cache = load_cache(cache_path)?;
    let files = collect_library_files(paths)?;

    // Skip entries whose cached fingerprint still matches; `--force`
    // re-analyzes everything.
    let mut to_scan = Vec::new();
    let mut reused = 0usize;
    for file in &files {
        let filename =
            file.file_name().map(|os| os.to_string_lossy().into_owned()).unwrap_or_default();
        if !force && cache.get(&filename).is_some_and(|entry| entry.is_fresh()) {
            log::debug!("cache hit for {}", file.display());
            reused += 1;
            continue;
        }
        to_scan.push(file.clone());
    }

    let options = ScanOptions { fail_fast, system };
    let outcome = scan_libraries(&to_scan, &options).context("Library scan failed")?;

    for failure in &outcome.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.error);
    }

    for scan in &outcome.scans {
        let hash = sha256_file(&scan.library.path).with_context(|| {
            format!("Failed to hash {}", scan.library.path.display())
        })?;
        cache.insert_scan(scan, hash);
        println!(
            "analyzed {} ({} defined, {} undefined)",
            scan.library.filename,
            scan.symbols.defined.len(),
            scan.symbols.undefined.len()
        );
    }

    cache.save(cache_path).context("Failed to write scan cache")?;

    println!(
        "Cache updated: {} analyzed, {} reused, {} skipped ({} tracked in total)",
        outcome.scans.len(),
        reused,
        outcome.failures.len(),
        cache.entries.len()
    );
    Ok(())
}
