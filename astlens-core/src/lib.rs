//! astlens core - structural pattern & dependency inference engine
//!
//! This crate turns a cluster of parsed source files into a compact analysis
//! record:
//! - Tree simplification into a normalized structural summary
//! - Frequency mining of declaration, import, export and method patterns
//! - Import-based and call-based dependency inference between files
//! - Cluster categorization and Mermaid graph rendering
//!
//! Every engine operation is a pure function of its input. Malformed trees
//! reduce a file's contribution instead of failing the cluster.

//#![deny(missing_docs)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::multiple_crate_versions,  // Common in large dependency trees
    clippy::module_name_repetitions,  // Often necessary for clarity
)]

pub mod analysis;
pub mod categorize;
pub mod graph;
pub mod models;
pub mod pattern;
pub mod relationships;
pub mod tree;

// Re-export commonly used types for convenience
pub use analysis::{build_analysis_prompt, ClusterAnalyzer, ClusterInput, PromptOptions};
pub use categorize::{categorize, CategoryRules, Categorizer, ClusterCategory, MarkerCategorizer};
pub use graph::render_graph;
pub use models::analysis_result::{BatchReport, ClusterAnalysisRecord, ClusterStatus};
pub use pattern::{extract_patterns, PatternRecord, PatternType};
pub use relationships::{
    build_symbol_index, extract_relationships, RelationshipEdge, RelationshipReport,
    RelationshipSet, SymbolIndex,
};
pub use tree::{parse_cluster, simplify, ClusterFile, SimplifiedTree, StructuralTree};

/// Result type used throughout astlens core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the fallible edges of the engine (input parsing,
/// configuration, serialization). Analysis itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] astlens_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Global configuration for astlens core
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Maximum number of files analyzed per cluster
    pub max_files: Option<usize>,
    /// Number of file identifiers kept as the cluster sample
    pub sample_size: usize,
    /// Analyze clusters of a batch in parallel
    pub parallel: bool,
    /// Categorization markers
    pub rules: CategoryRules,
    /// Summarization prompt layout
    pub prompt: PromptOptions,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            max_files: None,
            sample_size: 5,
            parallel: true,
            rules: CategoryRules::default(),
            prompt: PromptOptions::default(),
        }
    }
}

impl CoreConfig {
    /// Load a (possibly partial) TOML, JSON or YAML file over the defaults
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let config: Self = astlens_utils::ConfigBuilder::new().load_file(path)?.build();
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_files == Some(0) {
            return Err(Error::Config("max_files must be greater than zero".to_string()));
        }
        if self.rules.filename_rules.iter().any(|rule| rule.markers.is_empty()) {
            return Err(Error::Config("filename rules need at least one marker".to_string()));
        }
        Ok(())
    }
}
