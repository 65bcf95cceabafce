//! Inter-file relationship inference
//!
//! Two independent passes feed one de-duplicated edge set:
//! - **imports**: top-level `import ... from '<path>'` resolved to a cluster
//!   file through [`imports::service_from_import`]
//! - **calls**: `obj.method()` call sites anywhere in a file, attributed
//!   through the [`SymbolIndex`]
//!
//! Edges are kept in first-discovery order (import pass first, files in
//! input order), which keeps rendered graphs stable across runs.

use crate::tree::ClusterFile;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

pub mod calls;
pub mod imports;
pub mod symbols;

pub use symbols::{build_symbol_index, SymbolIndex};

/// Directed dependency: `source` depends on `target`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RelationshipEdge {
    pub source: String,
    pub target: String,
}

/// Ordered set of edges; self-edges are never stored
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipSet {
    edges: IndexSet<RelationshipEdge>,
}

impl RelationshipSet {
    /// Add `source → target`; returns false for self-edges and repeats
    pub fn insert(&mut self, source: &str, target: &str) -> bool {
        if source == target {
            return false;
        }
        self.edges.insert(RelationshipEdge {
            source: source.to_string(),
            target: target.to_string(),
        })
    }

    pub fn contains(&self, source: &str, target: &str) -> bool {
        self.iter().any(|edge| edge.source == source && edge.target == target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RelationshipEdge> {
        self.edges.iter()
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Files the given file depends on
    pub fn targets_of<'s>(&'s self, source: &'s str) -> impl Iterator<Item = &'s str> {
        self.iter()
            .filter(move |edge| edge.source == source)
            .map(|edge| edge.target.as_str())
    }
}

impl<'a> IntoIterator for &'a RelationshipSet {
    type Item = &'a RelationshipEdge;
    type IntoIter = indexmap::set::Iter<'a, RelationshipEdge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter()
    }
}

/// Everything the relationship passes learned about a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipReport {
    /// File identifiers in input order
    pub files: Vec<String>,
    /// De-duplicated union of both passes
    pub edges: RelationshipSet,
    /// Exported symbols per file
    pub exported_symbols: SymbolIndex,
    /// Cluster files each file imports, per the import pass
    pub file_imports: IndexMap<String, Vec<String>>,
}

impl RelationshipReport {
    /// Build the symbol index and run both passes
    pub fn build(files: &[ClusterFile]) -> Self {
        let exported_symbols = build_symbol_index(files);
        let (edges, file_imports) = discover(files, &exported_symbols);
        Self {
            files: files.iter().map(|file| file.id.clone()).collect(),
            edges,
            exported_symbols,
            file_imports,
        }
    }
}

/// Union of import-based and call-based edges for a cluster
pub fn extract_relationships(files: &[ClusterFile], index: &SymbolIndex) -> RelationshipSet {
    discover(files, index).0
}

fn discover(
    files: &[ClusterFile],
    index: &SymbolIndex,
) -> (RelationshipSet, IndexMap<String, Vec<String>>) {
    let known: IndexSet<&str> = files.iter().map(|file| file.id.as_str()).collect();
    let mut edges = RelationshipSet::default();
    let mut file_imports: IndexMap<String, Vec<String>> = IndexMap::new();

    for file in files {
        let targets = imports::resolve_imports(file, &known);
        for target in &targets {
            edges.insert(&file.id, target);
        }
        file_imports
            .entry(file.id.clone())
            .or_default()
            .extend(targets.into_iter().map(str::to_string));
    }
    let import_edges = edges.len();

    for file in files {
        for target in calls::call_targets(file, files, index) {
            edges.insert(&file.id, target);
        }
    }

    tracing::debug!(
        files = files.len(),
        import_edges,
        call_edges = edges.len() - import_edges,
        "extracted relationships"
    );

    (edges, file_imports)
}
