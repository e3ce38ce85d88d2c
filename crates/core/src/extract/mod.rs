//! Symbol table extraction from native library files.
//!
//! One entry point, `extract_library`, abstracts over the container
//! formats: static archives, shared objects, and GNU linker scripts that
//! stand in for shared objects. The container kind is decided by the
//! leading magic signature, never by the file extension.
//!
//! Extraction is a pure function of the file bytes: the result is the set
//! of symbols the library defines and the set it requires but does not
//! define. Local and hidden symbols are filtered here and never reach the
//! resolution stages.

mod archive;
mod elf;
mod script;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{ExtractedSymbols, Library, LibraryKind, LibraryScan, SymbolBinding};

pub(crate) const ELF_MAGIC: &[u8] = b"\x7fELF";
pub(crate) const ARCHIVE_MAGIC: &[u8] = b"!<arch>\n";

/// Per-library extraction failure.
///
/// These are never fatal to a whole run by themselves; the scan layer
/// collects them (or aborts on the first one when the caller asked for
/// fail-fast).
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The file carries neither an archive nor an ELF signature, and does
    /// not look like a linker script either.
    #[error(
        "{}: unrecognized library format (not an archive, shared object, or linker script)",
        .path.display()
    )]
    UnsupportedFormat { path: PathBuf },

    /// The container signature matched but the structure did not parse.
    /// `context` names the member or section where parsing broke.
    #[error("{}: malformed library ({context}): {detail}", .path.display())]
    MalformedLibrary { path: PathBuf, context: String, detail: String },

    /// The file could not be read at all.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub(crate) fn malformed(
        path: &Path,
        context: impl Into<String>,
        detail: impl ToString,
    ) -> Self {
        ExtractError::MalformedLibrary {
            path: path.to_path_buf(),
            context: context.into(),
            detail: detail.to_string(),
        }
    }
}

/// Extract the defined/undefined symbol sets of a single library file.
///
/// The container kind is sniffed from the leading bytes:
/// - `!<arch>\n` -> static archive; member symbol tables are merged and
///   intra-archive references resolved away first.
/// - `\x7fELF` -> must be a shared object (`ET_DYN`); its dynamic symbol
///   table is read directly.
/// - otherwise, a text file with `GROUP`/`INPUT` directives is treated as
///   a linker script and its member libraries are extracted and merged.
pub fn extract_library(path: &Path) -> Result<LibraryScan, ExtractError> {
    let bytes = fs::read(path)
        .map_err(|source| ExtractError::Io { path: path.to_path_buf(), source })?;
    extract_from_bytes(path, &bytes)
}

fn extract_from_bytes(path: &Path, bytes: &[u8]) -> Result<LibraryScan, ExtractError> {
    if bytes.starts_with(ARCHIVE_MAGIC) {
        let (symbols, members) = archive::archive_symbols(path, bytes)?;
        log_extracted(path, "static archive", &symbols);
        let library = Library::new(path, LibraryKind::Static).with_members(members);
        return Ok(LibraryScan { library, symbols });
    }

    if bytes.starts_with(ELF_MAGIC) {
        let symbols = elf::shared_object_symbols(path, bytes)?;
        log_extracted(path, "shared object", &symbols);
        // A shared object is its own single implicit member.
        let library = Library::new(path, LibraryKind::Dynamic);
        let members = vec![library.filename.clone()];
        return Ok(LibraryScan { library: library.with_members(members), symbols });
    }

    if let Some(members) = script::parse_link_script(bytes) {
        let symbols = script_symbols(path, &members)?;
        log_extracted(path, "linker script", &symbols);
        let library = Library::new(path, LibraryKind::Script).with_members(members);
        return Ok(LibraryScan { library, symbols });
    }

    Err(ExtractError::UnsupportedFormat { path: path.to_path_buf() })
}

/// Aggregate the members named by a linker script into one symbol set.
///
/// Members resolve relative to the script's directory when not absolute.
/// The group behaves like an archive: symbols satisfied inside the group
/// never surface as external dependencies.
fn script_symbols(path: &Path, members: &[String]) -> Result<ExtractedSymbols, ExtractError> {
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    let mut merged = ExtractedSymbols::default();

    for member in members {
        let member_path = if Path::new(member).is_absolute() {
            PathBuf::from(member)
        } else {
            base.join(member)
        };
        let scan = extract_library(&member_path)?;
        for (name, binding) in scan.symbols.defined {
            merged.add_defined(name, binding);
        }
        for name in scan.symbols.undefined {
            merged.add_undefined(name);
        }
    }

    merged.resolve_internal();
    Ok(merged)
}

/// Classification of one symbol table entry after binding/visibility
/// filtering. `None` means the entry does not participate in cross-library
/// linkage (local, hidden, section/file entries, unnamed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SymbolClass {
    Defined(SymbolBinding),
    Undefined,
}

/// Strip a `@VERSION` / `@@VERSION` qualifier from a symbol name.
/// Version-qualified references resolve by base name across libraries.
pub(crate) fn strip_version(name: &str) -> &str {
    match name.find('@') {
        Some(at) => &name[..at],
        None => name,
    }
}

fn log_extracted(path: &Path, kind: &str, symbols: &ExtractedSymbols) {
    log::debug!(
        "{}: {} with {} defined / {} undefined symbols",
        path.display(),
        kind,
        symbols.defined.len(),
        symbols.undefined.len()
    );
}
