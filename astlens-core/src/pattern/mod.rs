//! Pattern frequency mining
//!
//! Patterns are mined from the top-level statements of each file only. Each
//! table is a label → count map kept in first-seen order, so a stable sort by
//! count gives deterministic ties and a deterministic "top N".

use crate::tree::{ClusterFile, StructuralTree};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Entries kept for the truncated pattern types
pub const TOP_N: usize = 10;

/// Kinds of mined patterns, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    DeclarationTypes,
    ImportModules,
    ExportTypes,
    ClassMethods,
}

impl PatternType {
    pub const ALL: [Self; 4] = [
        Self::DeclarationTypes,
        Self::ImportModules,
        Self::ExportTypes,
        Self::ClassMethods,
    ];

    /// Maximum number of entries a record of this type carries
    pub const fn limit(self) -> Option<usize> {
        match self {
            Self::ImportModules | Self::ClassMethods => Some(TOP_N),
            Self::DeclarationTypes | Self::ExportTypes => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeclarationTypes => "declaration_types",
            Self::ImportModules => "import_modules",
            Self::ExportTypes => "export_types",
            Self::ClassMethods => "class_methods",
        }
    }

    /// Human-readable heading, e.g. "Import Modules"
    pub const fn title(self) -> &'static str {
        match self {
            Self::DeclarationTypes => "Declaration Types",
            Self::ImportModules => "Import Modules",
            Self::ExportTypes => "Export Types",
            Self::ClassMethods => "Class Methods",
        }
    }
}

impl std::fmt::Display for PatternType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ranked frequencies for one pattern type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub pattern_type: PatternType,
    /// `(label, count)`, count descending, ties in first-seen order
    pub data: Vec<(String, usize)>,
}

impl PatternRecord {
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.data.iter().map(|(label, _)| label.as_str())
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }

    pub fn count(&self, label: &str) -> Option<usize> {
        self.data.iter().find(|(l, _)| l == label).map(|(_, count)| *count)
    }
}

/// Find the record of a given type
pub fn find_record(patterns: &[PatternRecord], pattern_type: PatternType) -> Option<&PatternRecord> {
    patterns.iter().find(|record| record.pattern_type == pattern_type)
}

/// Label → count accumulator, threaded through folds by value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: IndexMap<String, usize>,
}

impl FrequencyTable {
    /// Table with one more occurrence of `label`
    #[must_use]
    pub fn record(mut self, label: &str) -> Self {
        *self.counts.entry(label.to_string()).or_insert(0) += 1;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Entries sorted by count descending; equal counts keep first-seen order
    pub fn ranked(&self, limit: Option<usize>) -> Vec<(String, usize)> {
        let mut data: Vec<(String, usize)> = self
            .counts
            .iter()
            .map(|(label, count)| (label.clone(), *count))
            .collect();
        data.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            data.truncate(limit);
        }
        data
    }
}

/// The four running tables of one extraction
#[derive(Debug, Clone, Default)]
struct PatternTables {
    declarations: FrequencyTable,
    imports: FrequencyTable,
    exports: FrequencyTable,
    methods: FrequencyTable,
}

impl PatternTables {
    fn absorb(self, node: &StructuralTree) -> Self {
        let Some(kind) = node.kind() else {
            return self;
        };

        let Self {
            mut declarations,
            mut imports,
            mut exports,
            mut methods,
        } = self;

        declarations = declarations.record(kind);

        match kind {
            "ImportDeclaration" => {
                if let Some(module) = node.source_value().filter(|m| !m.is_empty()) {
                    imports = imports.record(module);
                }
            }
            "ExportNamedDeclaration" | "ExportDefaultDeclaration" => {
                if let Some(inner) = node
                    .child("declaration")
                    .and_then(StructuralTree::kind)
                    .filter(|k| !k.is_empty())
                {
                    exports = exports.record(inner);
                }
            }
            "ClassDeclaration" => {
                methods = node
                    .path(&["body", "body"])
                    .map(StructuralTree::elements)
                    .unwrap_or_default()
                    .iter()
                    .filter(|member| member.is_kind("MethodDefinition"))
                    .filter_map(|member| member.path(&["key", "name"]).and_then(StructuralTree::as_str))
                    .filter(|name| !name.is_empty())
                    .fold(methods, FrequencyTable::record);
            }
            _ => {}
        }

        Self {
            declarations,
            imports,
            exports,
            methods,
        }
    }

    fn table(&self, pattern_type: PatternType) -> &FrequencyTable {
        match pattern_type {
            PatternType::DeclarationTypes => &self.declarations,
            PatternType::ImportModules => &self.imports,
            PatternType::ExportTypes => &self.exports,
            PatternType::ClassMethods => &self.methods,
        }
    }

    fn into_records(self) -> Vec<PatternRecord> {
        PatternType::ALL
            .into_iter()
            .filter(|pattern_type| !self.table(*pattern_type).is_empty())
            .map(|pattern_type| PatternRecord {
                pattern_type,
                data: self.table(pattern_type).ranked(pattern_type.limit()),
            })
            .collect()
    }
}

/// Mine pattern frequencies from the top-level statements of every file.
///
/// Empty tables produce no record.
pub fn extract_patterns(files: &[ClusterFile]) -> Vec<PatternRecord> {
    let tables = files
        .iter()
        .flat_map(ClusterFile::body)
        .fold(PatternTables::default(), PatternTables::absorb);

    tracing::debug!(
        files = files.len(),
        declaration_kinds = tables.declarations.len(),
        import_modules = tables.imports.len(),
        "extracted patterns"
    );

    tables.into_records()
}
