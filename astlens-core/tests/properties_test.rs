//! Property checks over randomly assembled clusters

use astlens_core::{
    build_symbol_index, extract_patterns, extract_relationships, simplify, ClusterAnalyzer,
    ClusterFile, PatternType,
};
use proptest::prelude::*;
use serde_json::{json, Value};

const NAMES: [&str; 6] = ["a", "b.service", "c.controller", "d", "e.repository", "f"];

fn statement() -> impl Strategy<Value = Value> {
    prop_oneof![
        (0..NAMES.len()).prop_map(|i| json!({
            "type": "ImportDeclaration",
            "source": {"type": "Literal", "value": format!("./{}", NAMES[i])}
        })),
        "[a-z]{1,6}".prop_map(|module| json!({
            "type": "ImportDeclaration",
            "source": {"type": "Literal", "value": module}
        })),
        (0..NAMES.len(), "[a-z]{1,3}").prop_map(|(i, method)| json!({
            "type": "ExpressionStatement",
            "expression": {
                "type": "CallExpression",
                "callee": {
                    "type": "MemberExpression",
                    "object": {"type": "Identifier", "name": NAMES[i]},
                    "property": {"type": "Identifier", "name": method}
                }
            }
        })),
        "[a-z]{1,3}".prop_map(|name| json!({
            "type": "ExportNamedDeclaration",
            "declaration": {"type": "FunctionDeclaration", "id": {"name": name}, "params": [null, {"name": "x"}, {}]}
        })),
        "[a-z]{1,3}".prop_map(|name| json!({
            "type": "ClassDeclaration",
            "id": {"name": "C"},
            "body": {"body": [{"type": "MethodDefinition", "key": {"name": name}}]}
        })),
        Just(Value::Null),
        any::<i32>().prop_map(Value::from),
    ]
}

fn cluster() -> impl Strategy<Value = Vec<ClusterFile>> {
    proptest::sample::subsequence(NAMES.to_vec(), 0..=NAMES.len())
        .prop_flat_map(|ids| {
            let bodies = proptest::collection::vec(proptest::collection::vec(statement(), 0..16), ids.len());
            (Just(ids), bodies)
        })
        .prop_map(|(ids, bodies)| {
            ids.into_iter()
                .zip(bodies)
                .map(|(id, body)| ClusterFile::new(id, json!({"type": "Program", "body": body})))
                .collect()
        })
}

proptest! {
    #[test]
    fn analysis_is_deterministic(files in cluster()) {
        let analyzer = ClusterAnalyzer::default();
        prop_assert_eq!(analyzer.analyze("p", &files), analyzer.analyze("p", &files));
        prop_assert_eq!(extract_patterns(&files), extract_patterns(&files));

        let index = build_symbol_index(&files);
        prop_assert_eq!(extract_relationships(&files, &index), extract_relationships(&files, &index));
    }

    #[test]
    fn edges_join_distinct_cluster_files(files in cluster()) {
        let index = build_symbol_index(&files);
        let edges = extract_relationships(&files, &index);
        let ids: Vec<&str> = files.iter().map(|f| f.id.as_str()).collect();

        for edge in &edges {
            prop_assert_ne!(&edge.source, &edge.target);
            prop_assert!(ids.contains(&edge.source.as_str()));
            prop_assert!(ids.contains(&edge.target.as_str()));
        }
    }

    #[test]
    fn truncated_patterns_stay_bounded(files in cluster()) {
        for record in extract_patterns(&files) {
            if let Some(limit) = record.pattern_type.limit() {
                prop_assert!(record.data.len() <= limit);
            }
            prop_assert!(record.data.windows(2).all(|w| w[0].1 >= w[1].1));
            prop_assert!(record.data.iter().all(|(_, count)| *count > 0));
        }
    }

    #[test]
    fn record_shape_follows_input(files in cluster()) {
        let record = ClusterAnalyzer::default().analyze("p", &files);

        prop_assert_eq!(record.file_count(), files.len());
        prop_assert_eq!(record.has_data(), !files.is_empty());
        prop_assert!(record.file_sample().len() <= 5);
        prop_assert!(record.flow_chart().starts_with("```mermaid\ngraph TD\n"));
        prop_assert!(record.flow_chart().ends_with("```\n"));
        prop_assert_eq!(record.flow_chart().matches(" --> ").count(), record.edges().len());
        if files.is_empty() {
            prop_assert!(record.patterns().is_empty());
        }
    }

    #[test]
    fn simplified_program_keeps_every_statement(files in cluster()) {
        for file in &files {
            let simplified = simplify(&file.tree);
            let statements = file.tree.get("body").map_or(0, |body| body.elements().len());
            prop_assert_eq!(&simplify(&file.tree), &simplified);
            prop_assert_eq!(simplified.kind.as_deref(), Some("Program"));
            prop_assert_eq!(simplified.body.map_or(0, |body| body.len()), statements);
        }
    }

    #[test]
    fn import_record_present_when_imports_exist(files in cluster()) {
        let imports = extract_patterns(&files)
            .into_iter()
            .find(|r| r.pattern_type == PatternType::ImportModules);
        let total: usize = files
            .iter()
            .map(|f| f.tree.get("body").map_or(0, |b| {
                b.elements().iter().filter(|n| n.is_kind("ImportDeclaration")).count()
            }))
            .sum();
        prop_assert_eq!(imports.is_some(), total > 0);
    }
}
