//! Heuristic call-site attribution.
//!
//! A call `obj.method()` is attributed to another cluster file when `obj` is
//! spelled like that file's identifier or when `method` is one of its
//! exported names. Matching is not scoped to imported bindings, so a file
//! that happens to export a same-named function also receives an edge.

use super::SymbolIndex;
use crate::tree::{ClusterFile, StructuralTree, TreeVisitor};

/// `object.property(...)` as written at a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberCall<'a> {
    pub object: Option<&'a str>,
    pub property: Option<&'a str>,
}

/// Collects member-expression calls anywhere in a tree
#[derive(Debug, Default)]
pub struct MemberCallCollector<'a> {
    pub calls: Vec<MemberCall<'a>>,
}

impl<'a> TreeVisitor<'a> for MemberCallCollector<'a> {
    fn visit_object(&mut self, node: &'a StructuralTree) {
        if !node.is_kind("CallExpression") {
            return;
        }
        let Some(callee) = node.child("callee").filter(|c| c.is_kind("MemberExpression")) else {
            return;
        };
        if let (Some(object), Some(property)) = (callee.child("object"), callee.child("property")) {
            self.calls.push(MemberCall {
                object: object.name(),
                property: property.name(),
            });
        }
    }
}

/// Every member call in a tree, in pre-order
pub fn member_calls(tree: &StructuralTree) -> Vec<MemberCall<'_>> {
    let mut collector = MemberCallCollector::default();
    tree.accept(&mut collector);
    collector.calls
}

/// Other cluster files this file appears to call into, in discovery order
/// (call-site order, then cluster order). May repeat.
///
/// Candidates always come from `files`; the index only supplies exported
/// names, so a file missing from it can still be matched by object name.
pub fn call_targets<'f>(file: &ClusterFile, files: &'f [ClusterFile], index: &SymbolIndex) -> Vec<&'f str> {
    let calls = member_calls(&file.tree);
    let mut targets = Vec::new();

    for call in &calls {
        for other in files.iter().filter(|other| other.id != file.id) {
            let object_matches = call.object == Some(other.id.as_str());
            let method_matches = call
                .property
                .zip(index.symbols(&other.id))
                .is_some_and(|(method, symbols)| symbols.contains(method));
            if object_matches || method_matches {
                targets.push(other.id.as_str());
            }
        }
    }

    tracing::trace!(file = %file.id, calls = calls.len(), targets = targets.len(), "scanned call sites");
    targets
}
