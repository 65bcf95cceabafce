//! Data models for cluster analysis results

pub mod analysis_result;

pub use analysis_result::{BatchReport, ClusterAnalysisRecord, ClusterStatus};
