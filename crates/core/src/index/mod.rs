//! Symbol index: which libraries define which names.
//!
//! Built once over the complete scan set and read-only afterwards.
//! Resolving incrementally while scanning would make edges depend on scan
//! completion order, so accumulation always finishes before any lookup.

use std::collections::HashMap;

use crate::model::{LibraryId, LibraryScan, SymbolBinding};

/// One library's claim on a symbol name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Definer {
    pub lib: LibraryId,
    pub binding: SymbolBinding,
}

/// Mapping from symbol name to the libraries defining it.
///
/// Definer lists are in scan order and hold one entry per library (the
/// extractor already collapsed multiple definitions inside one library to
/// the strongest binding), so iteration is reproducible across runs on
/// the same input set.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    definers: HashMap<String, Vec<Definer>>,
}

impl SymbolIndex {
    /// Build the index over a complete, scan-ordered set of libraries.
    pub fn build(scans: &[LibraryScan]) -> Self {
        let mut definers: HashMap<String, Vec<Definer>> = HashMap::new();
        for (idx, scan) in scans.iter().enumerate() {
            let lib = LibraryId(idx);
            for (name, &binding) in &scan.symbols.defined {
                definers.entry(name.clone()).or_default().push(Definer { lib, binding });
            }
        }
        log::debug!("symbol index holds {} distinct names", definers.len());
        Self { definers }
    }

    /// All libraries defining `name`, in scan order. Empty when nobody in
    /// the candidate set defines it; that is an answer, not an error.
    pub fn lookup(&self, name: &str) -> &[Definer] {
        self.definers.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct defined names in the candidate set.
    pub fn len(&self) -> usize {
        self.definers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definers.is_empty()
    }
}
