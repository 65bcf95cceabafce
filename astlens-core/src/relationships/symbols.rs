use crate::tree::{ClusterFile, StructuralTree};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

const EXPORT_KINDS: [&str; 2] = ["ExportNamedDeclaration", "ExportDefaultDeclaration"];

/// File identifier → names of its exported top-level declarations.
///
/// Files keep input order; names keep declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolIndex {
    files: IndexMap<String, IndexSet<String>>,
}

impl SymbolIndex {
    pub fn symbols(&self, file_id: &str) -> Option<&IndexSet<String>> {
        self.files.get(file_id)
    }

    pub fn exports(&self, file_id: &str, symbol: &str) -> bool {
        self.files
            .get(file_id)
            .is_some_and(|symbols| symbols.contains(symbol))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Collect exported symbol names for every file; files without any still
/// get an (empty) entry.
pub fn build_symbol_index(files: &[ClusterFile]) -> SymbolIndex {
    let mut index = SymbolIndex::default();
    for file in files {
        let exported = file
            .body()
            .iter()
            .filter(|node| node.kind().is_some_and(|kind| EXPORT_KINDS.contains(&kind)))
            .filter_map(|node| node.path(&["declaration", "id", "name"]))
            .filter_map(StructuralTree::as_str)
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        index.files.entry(file.id.clone()).or_default().extend(exported);
    }
    index
}
