//! Lossy reduction of a structural tree to the fields a reviewer needs:
//! kind, declaration name, parameter summary and module specifier.

use super::{StructuralTree, PROGRAM};
use serde::{Deserialize, Serialize};

/// Name given to declarations whose identifier cannot be read
pub const ANONYMOUS: &str = "anonymous";
/// Parameter slot holding `null`
pub const NULL_PARAM: &str = "null_param";
/// Destructured, defaulted or otherwise nameless parameter
pub const COMPLEX_PARAM: &str = "complex_param";

const DECLARATION_KINDS: [&str; 3] = ["FunctionDeclaration", "ClassDeclaration", "VariableDeclaration"];
/// Declarations that always bind an identifier when well formed
const NAMED_DECLARATION_KINDS: [&str; 2] = ["FunctionDeclaration", "ClassDeclaration"];
const MODULE_KINDS: [&str; 3] = ["ImportDeclaration", "ExportNamedDeclaration", "ExportAllDeclaration"];

/// Compact, normalized view of one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplifiedTree {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<String>>,
    #[serde(rename = "moduleSpecifier", default, skip_serializing_if = "Option::is_none")]
    pub module_specifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<SimplifiedTree>>,
}

impl SimplifiedTree {
    /// True for the value produced from an absent or kind-less node
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Simplify one tree. Never fails; unknown shapes keep only their kind.
///
/// Only `Program` nodes recurse, so recursion depth follows `Program`
/// nesting rather than general tree depth.
pub fn simplify(tree: &StructuralTree) -> SimplifiedTree {
    let Some(kind) = tree.kind() else {
        return SimplifiedTree::default();
    };

    let mut simplified = SimplifiedTree {
        kind: Some(kind.to_string()),
        ..SimplifiedTree::default()
    };

    if kind == PROGRAM {
        if let Some(body) = tree.get("body") {
            simplified.body = Some(body.elements().iter().map(simplify).collect());
        }
    }

    if DECLARATION_KINDS.contains(&kind) {
        simplified.name = declaration_name(tree, kind);
        simplified.params = tree
            .get("params")
            .filter(|params| matches!(params, StructuralTree::Sequence(_)))
            .map(|params| params.elements().iter().map(param_label).collect());
    }

    if MODULE_KINDS.contains(&kind) {
        simplified.module_specifier = Some(tree.source_value().unwrap_or_default().to_string());
    }

    simplified
}

fn declaration_name(tree: &StructuralTree, kind: &str) -> Option<String> {
    match tree.child("id") {
        Some(id) => Some(id.name().unwrap_or(ANONYMOUS).to_string()),
        None if NAMED_DECLARATION_KINDS.contains(&kind) => Some(ANONYMOUS.to_string()),
        None => None,
    }
}

fn param_label(param: &StructuralTree) -> String {
    if param.is_null() {
        return NULL_PARAM.to_string();
    }
    param.name().unwrap_or(COMPLEX_PARAM).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> StructuralTree {
        StructuralTree::from(value)
    }

    #[test]
    fn test_null_and_kindless_inputs() {
        assert!(simplify(&StructuralTree::null()).is_empty());
        assert!(simplify(&tree(json!({"body": []}))).is_empty());
        assert!(simplify(&tree(json!([1, 2]))).is_empty());
    }

    #[test]
    fn test_unknown_kind_keeps_only_kind() {
        let simplified = simplify(&tree(json!({
            "type": "ExpressionStatement",
            "expression": {"type": "Literal", "value": 1}
        })));
        assert_eq!(simplified.kind.as_deref(), Some("ExpressionStatement"));
        assert_eq!(simplified, SimplifiedTree { kind: simplified.kind.clone(), ..Default::default() });
    }

    #[test]
    fn test_param_sentinels() {
        let simplified = simplify(&tree(json!({
            "type": "FunctionDeclaration",
            "id": {"type": "Identifier", "name": "handle"},
            "params": [
                null,
                {"type": "ObjectPattern", "properties": []},
                {"type": "Identifier", "name": "req"}
            ]
        })));

        assert_eq!(simplified.name.as_deref(), Some("handle"));
        assert_eq!(
            simplified.params,
            Some(vec![NULL_PARAM.to_string(), COMPLEX_PARAM.to_string(), "req".to_string()])
        );
    }

    #[test]
    fn test_anonymous_names() {
        let no_id = simplify(&tree(json!({"type": "FunctionDeclaration", "id": null, "params": []})));
        assert_eq!(no_id.name.as_deref(), Some(ANONYMOUS));
        assert_eq!(no_id.params, Some(vec![]));

        let nameless_id = simplify(&tree(json!({"type": "ClassDeclaration", "id": {"type": "Identifier"}})));
        assert_eq!(nameless_id.name.as_deref(), Some(ANONYMOUS));
        assert_eq!(nameless_id.params, None);

        let variable = simplify(&tree(json!({"type": "VariableDeclaration", "declarations": []})));
        assert_eq!(variable.name, None);
    }

    #[test]
    fn test_module_specifier() {
        let import = simplify(&tree(json!({
            "type": "ImportDeclaration",
            "source": {"type": "Literal", "value": "./user.service"}
        })));
        assert_eq!(import.module_specifier.as_deref(), Some("./user.service"));

        let local_export = simplify(&tree(json!({"type": "ExportNamedDeclaration", "source": null})));
        assert_eq!(local_export.module_specifier.as_deref(), Some(""));
    }

    #[test]
    fn test_program_body_order() {
        let simplified = simplify(&tree(json!({
            "type": "Program",
            "body": [
                {"type": "ImportDeclaration", "source": {"value": "a"}},
                null,
                {"type": "ClassDeclaration", "id": {"name": "A"}}
            ]
        })));

        let body = simplified.body.expect("body");
        assert_eq!(body.len(), 3);
        assert_eq!(body[0].module_specifier.as_deref(), Some("a"));
        assert!(body[1].is_empty());
        assert_eq!(body[2].name.as_deref(), Some("A"));
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let input = tree(json!({
            "type": "Program",
            "body": [{"type": "FunctionDeclaration", "id": {"name": "f"}, "params": [null]}]
        }));
        assert_eq!(simplify(&input), simplify(&input));
    }

    #[test]
    fn test_serialized_keys() -> crate::Result<()> {
        let simplified = simplify(&tree(json!({
            "type": "FunctionDeclaration",
            "id": {"name": "f"},
            "params": []
        })));
        assert_eq!(
            serde_json::to_value(&simplified)?,
            json!({"type": "FunctionDeclaration", "name": "f", "params": []})
        );
        Ok(())
    }
}
