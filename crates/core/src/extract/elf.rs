//! ELF symbol table parsing for shared objects and archive members.

use std::path::Path;

use goblin::elf::header::ET_DYN;
use goblin::elf::sym::{Sym, STB_GLOBAL, STB_LOCAL, STB_WEAK, STT_FILE, STT_SECTION};
use goblin::elf::Elf;
use goblin::strtab::Strtab;

use super::{strip_version, ExtractError, SymbolClass};
use crate::model::{ExtractedSymbols, SymbolBinding};

// ELF symbol visibility, low bits of st_other.
const STV_INTERNAL: u8 = 1;
const STV_HIDDEN: u8 = 2;

/// Read the dynamic symbol table of a shared object.
///
/// Exported symbols with a defined section become the defined set; imports
/// become the undefined set. Anything local or hidden is dropped.
pub(crate) fn shared_object_symbols(
    path: &Path,
    bytes: &[u8],
) -> Result<ExtractedSymbols, ExtractError> {
    let elf = Elf::parse(bytes)
        .map_err(|err| ExtractError::malformed(path, "ELF header/sections", err))?;

    if elf.header.e_type != ET_DYN {
        // Executables and bare relocatable objects are not candidate
        // libraries; objects belong inside archives.
        return Err(ExtractError::UnsupportedFormat { path: path.to_path_buf() });
    }

    let mut symbols = ExtractedSymbols::default();
    for sym in elf.dynsyms.iter() {
        collect(&sym, &elf.dynstrtab, &mut symbols);
    }
    symbols.resolve_internal();
    Ok(symbols)
}

/// Read the static symbol table of a relocatable archive member.
///
/// Members carry `.symtab` rather than `.dynsym`; classification rules are
/// the same.
pub(crate) fn member_symbols(
    path: &Path,
    member: &str,
    bytes: &[u8],
    out: &mut ExtractedSymbols,
) -> Result<(), ExtractError> {
    let elf = Elf::parse(bytes)
        .map_err(|err| ExtractError::malformed(path, format!("archive member `{member}`"), err))?;

    for sym in elf.syms.iter() {
        collect(&sym, &elf.strtab, out);
    }
    Ok(())
}

fn collect(sym: &Sym, strtab: &Strtab, out: &mut ExtractedSymbols) {
    let Some((name, class)) = classify(sym, strtab) else { return };
    match class {
        SymbolClass::Defined(binding) => out.add_defined(name, binding),
        SymbolClass::Undefined => out.add_undefined(name),
    }
}

/// Apply the cross-library visibility rules to one symbol table entry.
///
/// Returns `None` for entries that cannot participate in linkage across
/// libraries: unnamed entries, section/file markers, local bindings, and
/// hidden/internal visibility.
pub(crate) fn classify(sym: &Sym, strtab: &Strtab) -> Option<(String, SymbolClass)> {
    let raw = strtab.get_at(sym.st_name)?;
    if raw.is_empty() {
        return None;
    }

    let st_type = sym.st_type();
    if st_type == STT_SECTION || st_type == STT_FILE {
        return None;
    }

    let bind = sym.st_bind();
    if bind == STB_LOCAL {
        return None;
    }

    let visibility = sym.st_other & 0x3;
    if visibility == STV_HIDDEN || visibility == STV_INTERNAL {
        return None;
    }

    let name = strip_version(raw).to_string();

    if sym.st_shndx == 0 {
        // SHN_UNDEF: referenced here, defined elsewhere.
        return Some((name, SymbolClass::Undefined));
    }

    let binding = match bind {
        STB_WEAK => SymbolBinding::Weak,
        STB_GLOBAL => SymbolBinding::Global,
        // GNU_UNIQUE and other nonstandard global-ish bindings.
        _ => SymbolBinding::Global,
    };
    Some((name, SymbolClass::Defined(binding)))
}
