//! Tree model for denada documents.
//!
//! A parsed document is an ordered sequence of [`Node`]s. Every node carries
//! qualifiers, modifiers and an optional description; the [`NodeKind`] tag
//! distinguishes leaf declarations from nested definitions. The same node
//! types double as rule trees: there the `description` field holds a
//! cardinality descriptor instead of prose.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Modifier map attached parenthetically to a node, e.g. `(units="V", fixed=true)`.
///
/// Keys are unique; the literal value domain is JSON.
pub type Modifiers = serde_json::Map<String, Value>;

/// Stable node identity, unique within one parse result.
///
/// Validation results are keyed by `NodeId` (see [`crate::validate::MatchTable`])
/// so the tree itself never has to be mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A single point in the source text. Lines and columns are 1-based,
/// offsets are 0-based byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// The source range a node was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// One element of a denada tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Ordered as written; order is irrelevant for matching but preserved
    /// for round-trip printing.
    pub qualifiers: Vec<String>,
    pub modifiers: Modifiers,
    /// Free text in content trees, a cardinality descriptor in rule trees.
    pub description: Option<String>,
    pub location: Option<Location>,
    /// Originating file name, when parsed from disk.
    pub file: Option<String>,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Discriminant of a [`Node`]: a typed, named leaf value or a named scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "element", rename_all = "lowercase")]
pub enum NodeKind {
    Declaration {
        typename: String,
        varname: String,
        /// Absent when the source had no `= value` clause. Note that this is
        /// distinct from an explicit `= null`.
        value: Option<Value>,
    },
    Definition {
        name: String,
        contents: Vec<Node>,
    },
}

impl Node {
    pub fn is_declaration(&self) -> bool {
        matches!(self.kind, NodeKind::Declaration { .. })
    }

    pub fn is_definition(&self) -> bool {
        matches!(self.kind, NodeKind::Definition { .. })
    }

    /// The nested contents of a definition, or `None` for declarations.
    pub fn contents(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Definition { contents, .. } => Some(contents),
            NodeKind::Declaration { .. } => None,
        }
    }
}

/// JSON type name of a literal value, as used by `$`-prefixed value patterns.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
