//! Core domain types: node references, relationships, traversal direction.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::MegaGraphError;

// ---------------------------------------------------------------------------
// NodeRef
// ---------------------------------------------------------------------------

/// A typed, identified object participating in relationships.
///
/// `kind` is the object type tag (`"Program"`, `"Control"`, ...). Two nodes
/// are of the same type exactly when their `kind` strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NodeRef {
    pub fn new(kind: impl Into<String>, id: i64) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }

    /// Whether `self` and `other` share the same type tag.
    pub fn same_kind(&self, other: &NodeRef) -> bool {
        self.kind == other.kind
    }
}

impl std::fmt::Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// Parses the `Type:id` form used on the command line.
impl FromStr for NodeRef {
    type Err = MegaGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s.rsplit_once(':').ok_or_else(|| {
            MegaGraphError::InvalidArgument(format!("expected TYPE:ID, got '{s}'"))
        })?;
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(MegaGraphError::InvalidArgument(format!(
                "missing type in '{s}'"
            )));
        }
        let id = id.trim().parse::<i64>().map_err(|e| {
            MegaGraphError::InvalidArgument(format!("bad id in '{s}': {e}"))
        })?;
        Ok(Self::new(kind, id))
    }
}

// ---------------------------------------------------------------------------
// Relationship
// ---------------------------------------------------------------------------

/// A directed link between two nodes, possibly of different types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub source_id: i64,
    pub source_type: String,
    pub destination_id: i64,
    pub destination_type: String,
}

impl Relationship {
    pub fn new(source: &NodeRef, destination: &NodeRef) -> Self {
        Self {
            source_id: source.id,
            source_type: source.kind.clone(),
            destination_id: destination.id,
            destination_type: destination.kind.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Which way a traversal walks the relationship graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Follow edges from source to destination.
    Children,
    /// Follow edges from destination back to source.
    Parents,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Children => "children",
            Self::Parents => "parents",
        }
    }

    /// The id a traversal advances to when it crosses `edge`.
    pub fn advancing_id(&self, edge: &Relationship) -> i64 {
        match self {
            Self::Children => edge.destination_id,
            Self::Parents => edge.source_id,
        }
    }
}

impl FromStr for Direction {
    type Err = MegaGraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "children" => Ok(Self::Children),
            "parents" => Ok(Self::Parents),
            other => Err(MegaGraphError::InvalidArgument(format!(
                "unknown direction '{other}', expected 'children' or 'parents'"
            ))),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
