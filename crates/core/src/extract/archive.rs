//! Static archive (`.a`) symbol extraction.
//!
//! An archive's symbol sets are the union over its ELF members, with
//! intra-archive resolution applied first: a name one member references
//! and another member defines is satisfied inside the archive and never
//! surfaces as an external dependency.

use std::path::Path;

use goblin::archive::Archive;

use super::{elf, ExtractError, ELF_MAGIC};
use crate::model::ExtractedSymbols;

pub(crate) fn archive_symbols(
    path: &Path,
    bytes: &[u8],
) -> Result<(ExtractedSymbols, Vec<String>), ExtractError> {
    let archive = Archive::parse(bytes)
        .map_err(|err| ExtractError::malformed(path, "archive member table", err))?;

    let mut symbols = ExtractedSymbols::default();
    let mut members = Vec::new();
    for member in archive.members() {
        let data = archive.extract(member, bytes).map_err(|err| {
            ExtractError::malformed(path, format!("archive member `{member}`"), err)
        })?;
        members.push(member.to_string());

        // Archives may carry non-object members (strtabs are handled by
        // goblin; anything else, e.g. embedded text, has no symbols).
        if !data.starts_with(ELF_MAGIC) {
            log::debug!("{}: skipping non-ELF archive member `{member}`", path.display());
            continue;
        }

        elf::member_symbols(path, member, data, &mut symbols)?;
    }

    symbols.resolve_internal();
    Ok((symbols, members))
}
