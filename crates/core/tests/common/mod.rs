//! Shared fixture builders for the integration tests.
//!
//! Archive members are synthesized with `object::write` (relocatable ELF
//! objects with a real `.symtab`); the archive container itself is framed
//! by hand since the GNU layout is sixty-byte text headers. Shared-object
//! fixtures are emitted as minimal `ET_DYN` images carrying only a
//! `.dynsym`/`.dynstr` pair, which is all the extractor reads.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use object::write::{Object, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};

use linkorder_core::model::{
    ExtractedSymbols, Library, LibraryKind, LibraryScan, SymbolBinding,
};

/// Visibility/binding classes for synthesized member symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Def {
    Global,
    Weak,
    /// Global binding with hidden visibility; must not escape the library.
    Hidden,
    /// Local binding; must not escape the object.
    Local,
}

/// Build a relocatable ELF object defining and referencing the given
/// symbol names.
pub fn elf_object(defined: &[(&str, Def)], undefined: &[&str]) -> Vec<u8> {
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);

    let text = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);
    obj.section_mut(text).append_data(&[0xC3], 1);

    for &(name, def) in defined {
        let (scope, weak) = match def {
            Def::Global => (SymbolScope::Dynamic, false),
            Def::Weak => (SymbolScope::Dynamic, true),
            Def::Hidden => (SymbolScope::Linkage, false),
            Def::Local => (SymbolScope::Compilation, false),
        };
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: 0,
            size: 0,
            kind: SymbolKind::Text,
            scope,
            weak,
            section: SymbolSection::Section(text),
            flags: SymbolFlags::None,
        });
    }

    for &name in undefined {
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: 0,
            size: 0,
            kind: SymbolKind::Unknown,
            scope: SymbolScope::Dynamic,
            weak: false,
            section: SymbolSection::Undefined,
            flags: SymbolFlags::None,
        });
    }

    obj.write().expect("synthesized object must serialize")
}

/// Frame members into a GNU `!<arch>` archive. Member names must fit the
/// 16-byte header field (15 chars plus the GNU `/` terminator).
pub fn write_archive(members: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut out = b"!<arch>\n".to_vec();
    for (name, data) in members {
        assert!(name.len() <= 15, "archive fixture member name too long: {name}");
        let header = format!(
            "{:<16}{:<12}{:<6}{:<6}{:<8}{:<10}`\n",
            format!("{name}/"),
            0,
            0,
            0,
            "100644",
            data.len()
        );
        assert_eq!(header.len(), 60);
        out.extend_from_slice(header.as_bytes());
        out.extend_from_slice(data);
        if data.len() % 2 == 1 {
            out.push(b'\n');
        }
    }
    out
}

// ELF constants used by the hand-rolled ET_DYN writer.
pub const STB_GLOBAL: u8 = 1;
pub const STB_WEAK: u8 = 2;
pub const STB_LOCAL: u8 = 0;
pub const STV_DEFAULT: u8 = 0;
pub const STV_HIDDEN: u8 = 2;

/// One `.dynsym` entry for [`shared_object`].
#[derive(Debug, Clone)]
pub struct DynSym {
    pub name: String,
    pub bind: u8,
    pub vis: u8,
    pub defined: bool,
}

impl DynSym {
    pub fn defined(name: &str) -> Self {
        Self { name: name.into(), bind: STB_GLOBAL, vis: STV_DEFAULT, defined: true }
    }

    pub fn weak(name: &str) -> Self {
        Self { name: name.into(), bind: STB_WEAK, vis: STV_DEFAULT, defined: true }
    }

    pub fn hidden(name: &str) -> Self {
        Self { name: name.into(), bind: STB_GLOBAL, vis: STV_HIDDEN, defined: true }
    }

    pub fn local(name: &str) -> Self {
        Self { name: name.into(), bind: STB_LOCAL, vis: STV_DEFAULT, defined: true }
    }

    pub fn undefined(name: &str) -> Self {
        Self { name: name.into(), bind: STB_GLOBAL, vis: STV_DEFAULT, defined: false }
    }
}

/// Emit a minimal little-endian ELF64 shared object (`ET_DYN`) whose
/// section table holds exactly `.dynsym`, `.dynstr`, and `.shstrtab`.
pub fn shared_object(symbols: &[DynSym]) -> Vec<u8> {
    const EHSIZE: u64 = 64;
    const SYM_SIZE: u64 = 24;
    const SHENTSIZE: u16 = 64;

    // .dynstr: leading NUL, then each name.
    let mut dynstr = vec![0u8];
    let mut name_offsets = Vec::with_capacity(symbols.len());
    for sym in symbols {
        name_offsets.push(dynstr.len() as u32);
        dynstr.extend_from_slice(sym.name.as_bytes());
        dynstr.push(0);
    }

    let shstrtab = b"\0.dynsym\0.dynstr\0.shstrtab\0".to_vec();
    let (dynsym_name, dynstr_name, shstrtab_name) = (1u32, 9u32, 17u32);

    let dynsym_off = EHSIZE;
    let dynsym_size = SYM_SIZE * (symbols.len() as u64 + 1);
    let dynstr_off = dynsym_off + dynsym_size;
    let shstrtab_off = dynstr_off + dynstr.len() as u64;
    let mut shoff = shstrtab_off + shstrtab.len() as u64;
    let pad = (8 - (shoff % 8)) % 8;
    shoff += pad;

    let mut out = Vec::new();

    // ELF header.
    out.extend_from_slice(&[0x7F, b'E', b'L', b'F', 2, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    out.extend_from_slice(&3u16.to_le_bytes()); // e_type = ET_DYN
    out.extend_from_slice(&62u16.to_le_bytes()); // e_machine = EM_X86_64
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&0u64.to_le_bytes()); // e_entry
    out.extend_from_slice(&0u64.to_le_bytes()); // e_phoff
    out.extend_from_slice(&shoff.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&(EHSIZE as u16).to_le_bytes()); // e_ehsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_phentsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&SHENTSIZE.to_le_bytes()); // e_shentsize
    out.extend_from_slice(&4u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&3u16.to_le_bytes()); // e_shstrndx
    assert_eq!(out.len() as u64, EHSIZE);

    // .dynsym: null entry, then one entry per symbol.
    out.extend_from_slice(&[0u8; 24]);
    for (sym, &name_off) in symbols.iter().zip(&name_offsets) {
        out.extend_from_slice(&name_off.to_le_bytes());
        out.push((sym.bind << 4) | 2); // st_info: STT_FUNC
        out.push(sym.vis); // st_other
        let shndx: u16 = if sym.defined { 0xFFF1 } else { 0 }; // SHN_ABS / SHN_UNDEF
        out.extend_from_slice(&shndx.to_le_bytes());
        let value: u64 = if sym.defined { 0x1000 } else { 0 };
        out.extend_from_slice(&value.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes()); // st_size
    }

    out.extend_from_slice(&dynstr);
    out.extend_from_slice(&shstrtab);
    out.extend_from_slice(&vec![0u8; pad as usize]);
    assert_eq!(out.len() as u64, shoff);

    // Section headers: null, .dynsym, .dynstr, .shstrtab.
    let mut shdr = |name: u32,
                    sh_type: u32,
                    flags: u64,
                    offset: u64,
                    size: u64,
                    link: u32,
                    info: u32,
                    addralign: u64,
                    entsize: u64| {
        out.extend_from_slice(&name.to_le_bytes());
        out.extend_from_slice(&sh_type.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&0u64.to_le_bytes()); // sh_addr
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&link.to_le_bytes());
        out.extend_from_slice(&info.to_le_bytes());
        out.extend_from_slice(&addralign.to_le_bytes());
        out.extend_from_slice(&entsize.to_le_bytes());
    };

    shdr(0, 0, 0, 0, 0, 0, 0, 0, 0);
    shdr(dynsym_name, 11, 2, dynsym_off, dynsym_size, 2, 1, 8, SYM_SIZE); // SHT_DYNSYM
    shdr(dynstr_name, 3, 2, dynstr_off, dynstr.len() as u64, 0, 0, 1, 0); // SHT_STRTAB
    shdr(shstrtab_name, 3, 0, shstrtab_off, shstrtab.len() as u64, 0, 0, 1, 0);

    out
}

/// Write fixture bytes to `dir/name` and return the full path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}

/// Construct an in-memory scan without touching the filesystem, for the
/// index/graph/sorter tests.
pub fn mem_scan(
    filename: &str,
    kind: LibraryKind,
    defined: &[(&str, SymbolBinding)],
    undefined: &[&str],
) -> LibraryScan {
    let mut symbols = ExtractedSymbols::default();
    for &(name, binding) in defined {
        symbols.add_defined(name, binding);
    }
    for &name in undefined {
        symbols.add_undefined(name);
    }
    LibraryScan { library: Library::new(filename, kind), symbols }
}
