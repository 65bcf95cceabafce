//! Structural tree model
//!
//! Trees arrive from an upstream parser as ESTree-shaped JSON. Nothing about
//! their shape is trusted: keys may be missing, children may be `null`, and a
//! role that normally holds an object may hold a scalar. The model is a plain
//! tagged union so every traversal is total by construction.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};

pub mod simplify;

pub use simplify::{simplify, SimplifiedTree};

/// Kind tag of the root node of every parsed file
pub const PROGRAM: &str = "Program";

/// One node of an upstream syntax tree.
///
/// Conversion from JSON and drop both run on explicit work-lists, so a
/// tree of any depth can be built and released without growing the stack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum StructuralTree {
    /// Keyed children, in source order
    Object(IndexMap<String, StructuralTree>),
    /// Ordered children
    Sequence(Vec<StructuralTree>),
    /// Scalar or `null`
    Leaf(Leaf),
}

/// Non-structural value
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
}

impl Default for StructuralTree {
    fn default() -> Self {
        Self::Leaf(Leaf::Null)
    }
}

impl StructuralTree {
    /// The absent tree
    pub const fn null() -> Self {
        Self::Leaf(Leaf::Null)
    }

    /// Parse a tree from JSON text, without serde_json's nesting limit
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        from_json_unbounded(text)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Leaf(Leaf::Null))
    }

    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Raw child lookup; `null` children are returned as-is
    pub fn get(&self, key: &str) -> Option<&StructuralTree> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Child lookup that treats a `null` child as missing
    pub fn child(&self, key: &str) -> Option<&StructuralTree> {
        self.get(key).filter(|value| !value.is_null())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Leaf(Leaf::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Elements of a sequence; empty for anything else
    pub fn elements(&self) -> &[StructuralTree] {
        match self {
            Self::Sequence(items) => items,
            _ => &[],
        }
    }

    /// The node's `type` tag, if it is an object carrying a string tag
    pub fn kind(&self) -> Option<&str> {
        self.get("type").and_then(Self::as_str)
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind() == Some(kind)
    }

    /// The node's own `name` string
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Self::as_str)
    }

    /// Follow a chain of object keys
    pub fn path(&self, keys: &[&str]) -> Option<&StructuralTree> {
        keys.iter().try_fold(self, |node, key| node.child(key))
    }

    /// Top-level statements of a `Program` root; empty for anything else
    pub fn program_body(&self) -> &[StructuralTree] {
        if self.is_kind(PROGRAM) {
            self.get("body").map(Self::elements).unwrap_or_default()
        } else {
            &[]
        }
    }

    /// `source.value` of an import/export node
    pub fn source_value(&self) -> Option<&str> {
        self.path(&["source", "value"]).and_then(Self::as_str)
    }

    /// Pre-order iterator over every value reachable from this one
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Drive a visitor over every value reachable from this one
    pub fn accept<'a, V: TreeVisitor<'a>>(&'a self, visitor: &mut V) {
        for value in self.descendants() {
            match value {
                Self::Object(_) => visitor.visit_object(value),
                Self::Sequence(items) => visitor.visit_sequence(items),
                Self::Leaf(leaf) => visitor.visit_leaf(leaf),
            }
        }
    }
}

/// Callbacks for [`StructuralTree::accept`]
pub trait TreeVisitor<'a> {
    fn visit_object(&mut self, _node: &'a StructuralTree) {}
    fn visit_sequence(&mut self, _items: &'a [StructuralTree]) {}
    fn visit_leaf(&mut self, _leaf: &'a Leaf) {}
}

/// Work-list traversal, so input depth never grows the call stack
pub struct Descendants<'a> {
    stack: Vec<&'a StructuralTree>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a StructuralTree;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.stack.pop()?;
        match value {
            StructuralTree::Object(map) => self.stack.extend(map.values().rev()),
            StructuralTree::Sequence(items) => self.stack.extend(items.iter().rev()),
            StructuralTree::Leaf(_) => {}
        }
        Some(value)
    }
}

impl Drop for StructuralTree {
    fn drop(&mut self) {
        let mut pending = match self {
            Self::Object(map) if !map.is_empty() => map.drain(..).map(|(_, v)| v).collect(),
            Self::Sequence(items) if !items.is_empty() => std::mem::take(items),
            _ => return,
        };
        while let Some(mut node) = pending.pop() {
            match &mut node {
                Self::Object(map) => pending.extend(map.drain(..).map(|(_, v)| v)),
                Self::Sequence(items) => pending.append(items),
                Self::Leaf(_) => {}
            }
        }
    }
}

impl Serialize for StructuralTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Object(map) => map.serialize(serializer),
            Self::Sequence(items) => items.serialize(serializer),
            Self::Leaf(Leaf::Null) => serializer.serialize_unit(),
            Self::Leaf(Leaf::Bool(b)) => serializer.serialize_bool(*b),
            Self::Leaf(Leaf::Number(n)) => n.serialize(serializer),
            Self::Leaf(Leaf::String(s)) => serializer.serialize_str(s),
        }
    }
}

/// A container being rebuilt while its children are converted
enum Pending {
    Sequence {
        rest: std::vec::IntoIter<serde_json::Value>,
        done: Vec<StructuralTree>,
    },
    Object {
        rest: serde_json::map::IntoIter,
        key: String,
        done: IndexMap<String, StructuralTree>,
    },
}

impl Pending {
    fn next_child(&mut self) -> Option<serde_json::Value> {
        match self {
            Self::Sequence { rest, .. } => rest.next(),
            Self::Object { rest, key, .. } => rest.next().map(|(k, v)| {
                *key = k;
                v
            }),
        }
    }

    fn attach(&mut self, tree: StructuralTree) {
        match self {
            Self::Sequence { done, .. } => done.push(tree),
            Self::Object { key, done, .. } => {
                done.insert(std::mem::take(key), tree);
            }
        }
    }

    fn finish(self) -> StructuralTree {
        match self {
            Self::Sequence { done, .. } => StructuralTree::Sequence(done),
            Self::Object { done, .. } => StructuralTree::Object(done),
        }
    }
}

impl From<serde_json::Value> for StructuralTree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        let mut stack: Vec<Pending> = Vec::new();
        let mut next = Some(value);
        loop {
            let mut finished = match next.take() {
                Some(Value::Array(items)) => {
                    stack.push(Pending::Sequence {
                        rest: items.into_iter(),
                        done: Vec::new(),
                    });
                    None
                }
                Some(Value::Object(map)) => {
                    stack.push(Pending::Object {
                        rest: map.into_iter(),
                        key: String::new(),
                        done: IndexMap::new(),
                    });
                    None
                }
                Some(Value::Null) | None => Some(Self::Leaf(Leaf::Null)),
                Some(Value::Bool(b)) => Some(Self::Leaf(Leaf::Bool(b))),
                Some(Value::Number(n)) => Some(Self::Leaf(Leaf::Number(n))),
                Some(Value::String(s)) => Some(Self::Leaf(Leaf::String(s))),
            };

            // Hand the finished value to its parent and find the next child
            loop {
                let Some(top) = stack.last_mut() else {
                    return finished.unwrap_or_default();
                };
                if let Some(tree) = finished.take() {
                    top.attach(tree);
                }
                if let Some(child) = top.next_child() {
                    next = Some(child);
                    break;
                }
                finished = stack.pop().map(Pending::finish);
            }
        }
    }
}

/// Deserialize JSON text with serde_json's nesting limit lifted
fn from_json_unbounded<T: DeserializeOwned>(text: &str) -> crate::Result<T> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    deserializer.disable_recursion_limit();
    let value = T::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value)
}

/// Parse a JSON array of `{"id", "tree"}` entries into cluster files
pub fn parse_cluster(text: &str) -> crate::Result<Vec<ClusterFile>> {
    from_json_unbounded(text)
}

/// One file of a cluster: its identifier and its (possibly malformed) tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterFile {
    pub id: String,
    #[serde(default)]
    pub tree: StructuralTree,
}

impl ClusterFile {
    pub fn new(id: impl Into<String>, tree: impl Into<StructuralTree>) -> Self {
        Self {
            id: id.into(),
            tree: tree.into(),
        }
    }

    /// Top-level statements; a non-`Program` root contributes nothing
    pub(crate) fn body(&self) -> &[StructuralTree] {
        if !self.tree.is_null() && !self.tree.is_kind(PROGRAM) {
            tracing::debug!(file = %self.id, kind = ?self.tree.kind(), "root is not a Program, skipping body");
        }
        self.tree.program_body()
    }
}

impl<S: Into<String>> From<(S, StructuralTree)> for ClusterFile {
    fn from((id, tree): (S, StructuralTree)) -> Self {
        Self::new(id, tree)
    }
}
