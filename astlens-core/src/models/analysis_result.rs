//! Cluster analysis result models
//!
//! Records are assembled once by the cluster analyzer and only read
//! afterwards, so fields are exposed through accessors.

use crate::categorize::ClusterCategory;
use crate::pattern::PatternRecord;
use crate::relationships::{RelationshipReport, RelationshipSet};
use serde::{Deserialize, Serialize};

/// Whether a cluster had anything to analyze
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ClusterStatus {
    Analyzed,
    NoData { reason: String },
}

/// Aggregate result for one cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAnalysisRecord {
    cluster_id: String,
    #[serde(flatten)]
    status: ClusterStatus,
    category: ClusterCategory,
    file_count: usize,
    patterns: Vec<PatternRecord>,
    relationships: RelationshipReport,
    flow_chart: String,
    file_sample: Vec<String>,
}

impl ClusterAnalysisRecord {
    pub(crate) fn new(
        cluster_id: String,
        category: ClusterCategory,
        patterns: Vec<PatternRecord>,
        relationships: RelationshipReport,
        flow_chart: String,
        sample_size: usize,
    ) -> Self {
        let file_sample = relationships.files.iter().take(sample_size).cloned().collect();
        Self {
            cluster_id,
            status: ClusterStatus::Analyzed,
            category,
            file_count: relationships.files.len(),
            patterns,
            relationships,
            flow_chart,
            file_sample,
        }
    }

    pub(crate) fn no_data(cluster_id: String, reason: impl Into<String>, flow_chart: String) -> Self {
        Self {
            cluster_id,
            status: ClusterStatus::NoData {
                reason: reason.into(),
            },
            category: ClusterCategory::Unspecified,
            file_count: 0,
            patterns: Vec::new(),
            relationships: RelationshipReport::default(),
            flow_chart,
            file_sample: Vec::new(),
        }
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub const fn status(&self) -> &ClusterStatus {
        &self.status
    }

    pub const fn has_data(&self) -> bool {
        matches!(self.status, ClusterStatus::Analyzed)
    }

    pub const fn category(&self) -> ClusterCategory {
        self.category
    }

    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    pub fn patterns(&self) -> &[PatternRecord] {
        &self.patterns
    }

    /// De-duplicated dependency edges
    pub const fn edges(&self) -> &RelationshipSet {
        &self.relationships.edges
    }

    /// Edges plus per-file exports and resolved imports
    pub const fn relationships(&self) -> &RelationshipReport {
        &self.relationships
    }

    /// Rendered Mermaid block
    pub fn flow_chart(&self) -> &str {
        &self.flow_chart
    }

    /// Leading file identifiers, for display
    pub fn file_sample(&self) -> &[String] {
        &self.file_sample
    }
}

/// Results for a batch of clusters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One record per input cluster, in input order
    pub records: Vec<ClusterAnalysisRecord>,
    /// Clusters per category, count descending, ties in first-seen order
    pub category_distribution: Vec<(ClusterCategory, usize)>,
}

impl BatchReport {
    pub fn new(records: Vec<ClusterAnalysisRecord>) -> Self {
        let mut counts: indexmap::IndexMap<ClusterCategory, usize> = indexmap::IndexMap::new();
        for record in records.iter().filter(|record| record.has_data()) {
            *counts.entry(record.category()).or_insert(0) += 1;
        }
        let mut category_distribution: Vec<(ClusterCategory, usize)> = counts.into_iter().collect();
        category_distribution.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            records,
            category_distribution,
        }
    }

    pub fn analyzed(&self) -> impl Iterator<Item = &ClusterAnalysisRecord> {
        self.records.iter().filter(|record| record.has_data())
    }

    pub fn empty_clusters(&self) -> impl Iterator<Item = &ClusterAnalysisRecord> {
        self.records.iter().filter(|record| !record.has_data())
    }
}
