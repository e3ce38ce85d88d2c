//! Core data model for libraries and the symbols they define or require.
//!
//! Everything downstream (index, graph, sorter) works on these value types;
//! the binary-format details stay inside the `extract` module.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Container kind of a library file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryKind {
    /// Static archive (`!<arch>` magic, usually `.a`).
    Static,
    /// Shared object (`ET_DYN` ELF, usually `.so`).
    Dynamic,
    /// Text linker script standing in for a shared object (`GROUP(...)`).
    Script,
}

impl LibraryKind {
    /// Whether this kind takes the dynamic side of the linker's
    /// dynamic-over-static search preference.
    pub fn prefers_dynamic(self) -> bool {
        matches!(self, LibraryKind::Dynamic | LibraryKind::Script)
    }
}

/// External binding of a defined symbol.
///
/// Local and hidden symbols never cross a library boundary, so they are
/// filtered out during extraction and have no variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolBinding {
    /// Strong global definition.
    Global,
    /// Weak definition; overridable by a strong definition elsewhere.
    Weak,
}

/// One candidate library in a scan set.
///
/// Created once per input path at scan time and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
    /// Short logical name: `libfoo.a` -> `foo`.
    pub name: String,
    /// On-disk file name (`libfoo.a`).
    pub filename: String,
    /// Full path the library was scanned from.
    pub path: PathBuf,
    /// Container kind, decided by magic signature rather than extension.
    pub kind: LibraryKind,
    /// Member object files in container order: the archive members, the
    /// script's group members, or the shared object itself.
    pub members: Vec<String>,
    /// Caller-set flag marking toolchain/system libraries; only used by
    /// presentation-side filters, never by resolution.
    pub system: bool,
}

impl Library {
    pub fn new(path: impl Into<PathBuf>, kind: LibraryKind) -> Self {
        let path = path.into();
        let filename =
            path.file_name().map(|os| os.to_string_lossy().into_owned()).unwrap_or_default();
        let name = strip_library_name(&filename);
        Self { name, filename, path, kind, members: Vec::new(), system: false }
    }

    /// Builder-style helper for the member list.
    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    /// Builder-style helper for the system flag.
    pub fn with_system(mut self, system: bool) -> Self {
        self.system = system;
        self
    }
}

/// Index of a library in the scan-ordered library table.
///
/// Scan order is the determinism anchor: definer lists, tie-breaks and
/// report ordering all fall back to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LibraryId(pub usize);

impl LibraryId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Symbol sets extracted from one library.
///
/// `defined` keeps the strongest binding seen for each name: a symbol
/// defined weak in one archive member and strong in another records as
/// strong. `undefined` holds names the library references but does not
/// itself define (intra-archive references are already resolved away).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSymbols {
    pub defined: BTreeMap<String, SymbolBinding>,
    pub undefined: BTreeSet<String>,
}

impl ExtractedSymbols {
    /// Record a definition, upgrading weak to strong but never downgrading.
    pub fn add_defined(&mut self, name: impl Into<String>, binding: SymbolBinding) {
        let name = name.into();
        match self.defined.get(&name) {
            Some(SymbolBinding::Global) => {}
            _ => {
                self.defined.insert(name, binding);
            }
        }
    }

    pub fn add_undefined(&mut self, name: impl Into<String>) {
        self.undefined.insert(name.into());
    }

    /// Drop undefined entries satisfied by this library's own definitions.
    /// Self-satisfaction is not a dependency.
    pub fn resolve_internal(&mut self) {
        let defined = &self.defined;
        self.undefined.retain(|name| !defined.contains_key(name));
    }
}

/// Extraction result for one scanned input: the library identity plus its
/// symbol sets. The unit everything downstream consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryScan {
    pub library: Library,
    pub symbols: ExtractedSymbols,
}

/// Strip a library file name down to its short logical name:
/// `libfoo.a` and `libfoo.so` both become `foo`.
pub fn strip_library_name(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .map(|os| os.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    stem.strip_prefix("lib").unwrap_or(&stem).to_string()
}
