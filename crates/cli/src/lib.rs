use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use linkorder_core::model::{strip_library_name, Library};

/// How library names are rendered in text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameStyle {
    /// Short logical name (`libfoo.a` -> `foo`).
    Short,
    /// On-disk file name (`libfoo.a`).
    Full,
}

/// Render a library per the chosen name style, wrapped in `quote`.
pub fn format_library(library: &Library, style: NameStyle, quote: &str) -> String {
    let name = match style {
        NameStyle::Short => library.name.as_str(),
        NameStyle::Full => library.filename.as_str(),
    };
    format!("{quote}{name}{quote}")
}

/// Render a bare file name per the chosen name style, wrapped in `quote`.
pub fn format_filename(filename: &str, style: NameStyle, quote: &str) -> String {
    match style {
        NameStyle::Short => {
            let short = strip_library_name(filename);
            format!("{quote}{short}{quote}")
        }
        NameStyle::Full => format!("{quote}{filename}{quote}"),
    }
}

/// Expand the given paths into a flat list of library files.
///
/// Files pass through untouched (the extractor decides by magic, not
/// extension); directories are searched recursively for `*.a` and `*.so`
/// files. Directory entries are visited in sorted order so the resulting
/// scan order is stable across runs and filesystems.
pub fn collect_library_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_from_dir(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn collect_from_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            collect_from_dir(&entry, files)?;
        } else if matches!(entry.extension().and_then(|e| e.to_str()), Some("a" | "so")) {
            files.push(entry);
        }
    }
    Ok(())
}
