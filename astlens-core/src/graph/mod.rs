//! Mermaid rendering of a cluster's dependency graph

use crate::relationships::RelationshipSet;

const FENCE_OPEN: &str = "```mermaid\n";
const FENCE_CLOSE: &str = "```\n";
const DIRECTION: &str = "graph TD\n";
const INDENT: &str = "    ";

/// Mermaid-safe node identifier: `.` and `-` become `_`
pub fn node_id(file_id: &str) -> String {
    file_id.replace(['.', '-'], "_")
}

/// Render a fenced Mermaid flowchart with one node per file (input order)
/// and one arrow per edge (set order). Labels keep the original identifier.
pub fn render_graph(file_ids: &[String], relationships: &RelationshipSet) -> String {
    let mut out = String::from(FENCE_OPEN);
    out.push_str(DIRECTION);

    for file_id in file_ids {
        out.push_str(&format!("{INDENT}{}[\"{}\"]\n", node_id(file_id), file_id));
    }

    for edge in relationships {
        out.push_str(&format!(
            "{INDENT}{} --> {}\n",
            node_id(&edge.source),
            node_id(&edge.target)
        ));
    }

    out.push_str(FENCE_CLOSE);
    out
}
