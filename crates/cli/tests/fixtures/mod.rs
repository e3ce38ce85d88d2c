//! Minimal fixture builders for CLI tests: relocatable ELF members via
//! `object::write`, framed into GNU archives by hand.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use object::write::{Object, Symbol, SymbolSection};
use object::{
    Architecture, BinaryFormat, Endianness, SectionKind, SymbolFlags, SymbolKind, SymbolScope,
};

/// Build a relocatable ELF object with global definitions and references.
pub fn elf_object(defined: &[&str], undefined: &[&str]) -> Vec<u8> {
    let mut obj = Object::new(BinaryFormat::Elf, Architecture::X86_64, Endianness::Little);

    let text = obj.add_section(Vec::new(), b".text".to_vec(), SectionKind::Text);
    obj.section_mut(text).append_data(&[0xC3], 1);

    for &name in defined {
        obj.add_symbol(Symbol {
            name: name.as_bytes().to_vec(),
            value: 0,
            size: 0,
            kind: SymbolKind::Text,
            scope: SymbolScope::Dynamic,
            weak: false,
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

/// Frame members into a GNU `!<arch>` archive.
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

/// Write an archive defining `defined` and referencing `undefined` at
/// `dir/name`, returning the path.
pub fn archive_fixture(
    dir: &Path,
    name: &str,
    defined: &[&str],
    undefined: &[&str],
) -> PathBuf {
    let member = elf_object(defined, undefined);
    let bytes = write_archive(&[("m.o", member)]);
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("write fixture");
    path
}
