//! Review prompt assembly for an analyzed cluster.
//!
//! The prompt is plain text meant for a downstream summarizer. Nothing here
//! talks to a model.

use crate::models::analysis_result::ClusterAnalysisRecord;
use crate::tree::{simplify, ClusterFile, SimplifiedTree};
use serde::{Deserialize, Serialize};

/// Prompt sizing knobs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptOptions {
    /// Entries listed per pattern type
    pub patterns_per_type: usize,
    /// Files whose simplified tree is embedded
    pub sample_trees: usize,
}

impl Default for PromptOptions {
    fn default() -> Self {
        Self {
            patterns_per_type: 5,
            sample_trees: 2,
        }
    }
}

#[derive(Serialize)]
struct TreeSample<'a> {
    file: &'a str,
    tree: SimplifiedTree,
}

/// Build the review prompt for `record`. `files` are the cluster's inputs,
/// used only for the simplified tree samples.
pub fn build_analysis_prompt(
    record: &ClusterAnalysisRecord,
    files: &[ClusterFile],
    options: &PromptOptions,
) -> crate::Result<String> {
    let mut out = String::new();

    out.push_str(&format!("Cluster {} ({})\n", record.cluster_id(), record.category()));
    out.push_str(&format!("Files: {}\n", record.file_count()));
    out.push_str(&serde_json::to_string(&record.relationships().files)?);
    out.push('\n');

    out.push_str("\nPatterns:\n");
    for pattern in record.patterns() {
        out.push_str(&format!("{}:\n", pattern.pattern_type.title()));
        for (label, count) in pattern.data.iter().take(options.patterns_per_type) {
            out.push_str(&format!("- {label}: {count}\n"));
        }
    }

    out.push_str("\nDependency graph:\n");
    out.push_str(record.flow_chart());

    let samples: Vec<TreeSample<'_>> = files
        .iter()
        .take(options.sample_trees)
        .map(|file| TreeSample {
            file: &file.id,
            tree: simplify(&file.tree),
        })
        .collect();
    if !samples.is_empty() {
        out.push_str("\nSample structure:\n");
        out.push_str(&serde_json::to_string_pretty(&samples)?);
        out.push('\n');
    }

    out.push_str(
        "\nDescribe the responsibility of this cluster, how its files depend on each \
         other, and any notable design patterns.\n",
    );

    tracing::debug!(cluster = record.cluster_id(), bytes = out.len(), "built prompt");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::ClusterAnalyzer;
    use serde_json::json;

    fn files() -> Vec<ClusterFile> {
        ["a.service.ts", "b.service.ts", "c.service.ts"]
            .into_iter()
            .map(|id| {
                ClusterFile::new(id, json!({
                    "type": "Program",
                    "body": [
                        {"type": "ImportDeclaration", "source": {"value": "typeorm"}},
                        {"type": "FunctionDeclaration", "id": {"name": "run"}, "params": [null]}
                    ]
                }))
            })
            .collect()
    }

    #[test]
    fn test_prompt_sections() -> crate::Result<()> {
        let files = files();
        let record = ClusterAnalyzer::default().analyze("3", &files);
        let prompt = build_analysis_prompt(&record, &files, &PromptOptions::default())?;

        assert!(prompt.starts_with(
            "Cluster 3 (Services)\n\
             Files: 3\n\
             [\"a.service.ts\",\"b.service.ts\",\"c.service.ts\"]\n\
             \n\
             Patterns:\n\
             Declaration Types:\n\
             - ImportDeclaration: 3\n\
             - FunctionDeclaration: 3\n"
        ));
        assert!(prompt.contains("Import Modules:\n- typeorm: 3\n"));
        assert!(prompt.contains("```mermaid\ngraph TD\n"));
        assert!(prompt.contains("\"null_param\""));
        assert!(prompt.contains("\"file\": \"b.service.ts\""));
        assert!(!prompt.contains("\"file\": \"c.service.ts\""));
        Ok(())
    }

    #[test]
    fn test_prompt_limits_entries() -> crate::Result<()> {
        let tree = json!({
            "type": "Program",
            "body": (0..8)
                .map(|i| json!({"type": "ImportDeclaration", "source": {"value": format!("m{i}")}}))
                .collect::<Vec<_>>()
        });
        let files = vec![ClusterFile::new("x", tree)];
        let record = ClusterAnalyzer::default().analyze("x", &files);
        let options = PromptOptions {
            patterns_per_type: 5,
            sample_trees: 0,
        };
        let prompt = build_analysis_prompt(&record, &files, &options)?;

        assert!(prompt.contains("- m4: 1\n"));
        assert!(!prompt.contains("- m5: 1\n"));
        assert!(!prompt.contains("Sample structure"));
        Ok(())
    }

    #[test]
    fn test_prompt_for_empty_cluster() -> crate::Result<()> {
        let record = ClusterAnalyzer::default().analyze("empty", &[]);
        let prompt = build_analysis_prompt(&record, &[], &PromptOptions::default())?;

        assert!(prompt.contains("Files: 0\n[]\n"));
        assert!(prompt.contains("Unspecified Components"));
        Ok(())
    }
}
