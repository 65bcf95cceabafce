//! Cluster analysis orchestration
//!
//! [`ClusterAnalyzer`] sequences the engine for one cluster:
//! patterns → symbol index → relationships → graph → category → record.
//! Clusters share nothing, so a batch is analyzed in parallel.

use crate::categorize::{Categorizer, MarkerCategorizer};
use crate::graph::render_graph;
use crate::models::analysis_result::{BatchReport, ClusterAnalysisRecord};
use crate::pattern::extract_patterns;
use crate::relationships::{RelationshipReport, RelationshipSet};
use crate::tree::ClusterFile;
use crate::CoreConfig;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

pub mod prompt;

pub use prompt::{build_analysis_prompt, PromptOptions};

/// Reason recorded for clusters without files
pub const NO_FILES_REASON: &str = "no files in cluster";

/// One cluster to analyze
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterInput {
    pub id: String,
    pub files: Vec<ClusterFile>,
}

impl ClusterInput {
    pub fn new(id: impl Into<String>, files: Vec<ClusterFile>) -> Self {
        Self {
            id: id.into(),
            files,
        }
    }
}

/// Runs the engine over clusters
pub struct ClusterAnalyzer {
    config: CoreConfig,
    categorizer: Box<dyn Categorizer>,
}

impl std::fmt::Debug for ClusterAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterAnalyzer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for ClusterAnalyzer {
    fn default() -> Self {
        Self::new(CoreConfig::default())
    }
}

impl ClusterAnalyzer {
    pub fn new(config: CoreConfig) -> Self {
        let categorizer = Box::new(MarkerCategorizer::new(config.rules.clone()));
        Self {
            config,
            categorizer,
        }
    }

    /// Replace the categorization policy
    #[must_use]
    pub fn with_categorizer(mut self, categorizer: impl Categorizer + 'static) -> Self {
        self.categorizer = Box::new(categorizer);
        self
    }

    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Analyze one cluster. Degenerate input yields a `NoData` record.
    pub fn analyze(&self, cluster_id: &str, files: &[ClusterFile]) -> ClusterAnalysisRecord {
        let files = match self.config.max_files {
            Some(max) if files.len() > max => {
                tracing::debug!(cluster = cluster_id, total = files.len(), max, "capping cluster size");
                &files[..max]
            }
            _ => files,
        };

        if files.is_empty() {
            tracing::warn!(cluster = cluster_id, "cluster has no files");
            return ClusterAnalysisRecord::no_data(
                cluster_id.to_string(),
                NO_FILES_REASON,
                render_graph(&[], &RelationshipSet::default()),
            );
        }

        let patterns = extract_patterns(files);
        let relationships = RelationshipReport::build(files);
        let flow_chart = render_graph(&relationships.files, &relationships.edges);
        let category = self.categorizer.categorize(&relationships.files, &patterns);

        tracing::info!(
            cluster = cluster_id,
            files = files.len(),
            edges = relationships.edges.len(),
            category = %category,
            "analyzed cluster"
        );

        ClusterAnalysisRecord::new(
            cluster_id.to_string(),
            category,
            patterns,
            relationships,
            flow_chart,
            self.config.sample_size,
        )
    }

    pub fn analyze_input(&self, input: &ClusterInput) -> ClusterAnalysisRecord {
        self.analyze(&input.id, &input.files)
    }

    /// Analyze many clusters; records keep input order
    pub fn analyze_batch(&self, clusters: &[ClusterInput]) -> BatchReport {
        let records: Vec<ClusterAnalysisRecord> = if self.config.parallel {
            clusters.par_iter().map(|cluster| self.analyze_input(cluster)).collect()
        } else {
            clusters.iter().map(|cluster| self.analyze_input(cluster)).collect()
        };

        let report = BatchReport::new(records);
        tracing::info!(
            clusters = clusters.len(),
            empty = report.empty_clusters().count(),
            "batch complete"
        );
        report
    }
}
