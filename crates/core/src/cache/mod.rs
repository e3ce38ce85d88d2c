//! Persistent scan cache.
//!
//! Extraction dominates a run's cost, so the CLI keeps scan results in a
//! JSON document between invocations. An entry is only reused while the
//! stored content hash still matches the file on disk; graph and order
//! are always recomputed from the cached symbol sets, never persisted.

use std::collections::BTreeMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::{ExtractedSymbols, Library, LibraryKind, LibraryScan};

/// Format version of the cache document; bump when the shape changes.
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: invalid cache file: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The document parsed but was written by an incompatible version.
    #[error(
        "{}: cache version {found} is not supported (expected {expected})",
        .path.display()
    )]
    Version { path: PathBuf, found: u32, expected: u32 },
}

/// One cached library scan with its freshness fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub filename: String,
    pub path: PathBuf,
    pub kind: LibraryKind,
    pub members: Vec<String>,
    pub system: bool,
    /// SHA-256 of the library file content at scan time.
    pub sha256: String,
    pub symbols: ExtractedSymbols,
}

impl CacheEntry {
    pub fn from_scan(scan: &LibraryScan, sha256: String) -> Self {
        Self {
            filename: scan.library.filename.clone(),
            path: scan.library.path.clone(),
            kind: scan.library.kind,
            members: scan.library.members.clone(),
            system: scan.library.system,
            sha256,
            symbols: scan.symbols.clone(),
        }
    }

    pub fn to_scan(&self) -> LibraryScan {
        let library = Library::new(&self.path, self.kind)
            .with_members(self.members.clone())
            .with_system(self.system);
        LibraryScan { library, symbols: self.symbols.clone() }
    }

    /// Whether the on-disk file still matches this entry's fingerprint.
    /// Unreadable or missing files count as stale.
    pub fn is_fresh(&self) -> bool {
        matches!(sha256_file(&self.path), Ok(hash) if hash == self.sha256)
    }
}

/// The cache document: entries keyed by file name, insertion-stable via
/// the sorted map so the file diff cleanly under version control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCache {
    pub version: u32,
    /// RFC 3339 timestamp of the last save.
    pub generated_at: String,
    pub entries: BTreeMap<String, CacheEntry>,
}

impl Default for ScanCache {
    fn default() -> Self {
        Self { version: CACHE_VERSION, generated_at: String::new(), entries: BTreeMap::new() }
    }
}

impl ScanCache {
    /// Load the cache at `path`; a missing file yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(CacheError::Io { path: path.to_path_buf(), source }),
        };

        let cache: Self = serde_json::from_str(&text)
            .map_err(|source| CacheError::Format { path: path.to_path_buf(), source })?;
        if cache.version != CACHE_VERSION {
            return Err(CacheError::Version {
                path: path.to_path_buf(),
                found: cache.version,
                expected: CACHE_VERSION,
            });
        }
        Ok(cache)
    }

    /// Write the cache document as pretty JSON, stamping `generated_at`.
    pub fn save(&mut self, path: &Path) -> Result<(), CacheError> {
        self.generated_at = chrono::Utc::now().to_rfc3339();
        let json = serde_json::to_string_pretty(self)
            .map_err(|source| CacheError::Format { path: path.to_path_buf(), source })?;
        fs::write(path, json).map_err(|source| CacheError::Io { path: path.to_path_buf(), source })
    }

    /// Record a scan, replacing any previous entry for the same file name.
    pub fn insert_scan(&mut self, scan: &LibraryScan, sha256: String) {
        self.entries.insert(scan.library.filename.clone(), CacheEntry::from_scan(scan, sha256));
    }

    pub fn get(&self, filename: &str) -> Option<&CacheEntry> {
        self.entries.get(filename)
    }

    /// Materialize every cached entry back into a scan set, in the
    /// cache's stable (file name) order.
    pub fn to_scans(&self) -> Vec<LibraryScan> {
        self.entries.values().map(CacheEntry::to_scan).collect()
    }

    /// Resolve a user-supplied library name to a cached file name.
    ///
    /// Accepts short names (`foo`), `lib`-prefixed names, and full file
    /// names; a bare name tries `lib<name>.a` then `lib<name>.so`.
    pub fn resolve_name(&self, name: &str) -> Option<String> {
        if self.entries.contains_key(name) {
            return Some(name.to_string());
        }

        let prefixed =
            if name.starts_with("lib") { name.to_string() } else { format!("lib{name}") };
        if self.entries.contains_key(&prefixed) {
            return Some(prefixed);
        }
        for candidate in [format!("{prefixed}.a"), format!("{prefixed}.so")] {
            if self.entries.contains_key(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

/// SHA-256 of a file's content as a lowercase hex string.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
