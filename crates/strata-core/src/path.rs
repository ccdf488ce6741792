//! Dotted node paths

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A node id split into its dotted segments.
///
/// Ids form a strict prefix hierarchy: a container's path is a prefix of the
/// paths of everything it contains. Segments never contain dots themselves;
/// embedded dots are replaced with underscores on construction so that the
/// dotted rendering stays unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath {
    parts: Vec<String>,
}

impl NodePath {
    pub fn new<S: Into<String>>(parts: impl IntoIterator<Item = S>) -> Self {
        NodePath {
            parts: parts
                .into_iter()
                .map(|p| p.into().replace('.', "_"))
                .collect(),
        }
    }

    pub fn from_dotted(dotted: &str) -> Self {
        NodePath {
            parts: dotted.split('.').map(str::to_string).collect(),
        }
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty() || (self.parts.len() == 1 && self.parts[0].trim().is_empty())
    }

    /// The final segment, i.e. the simple name of the node.
    pub fn simple_name(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or("")
    }

    /// All segments except the last one, i.e. the enclosing namespace.
    pub fn namespace(&self) -> &[String] {
        &self.parts[..self.parts.len().saturating_sub(1)]
    }

    /// The parent path, or `None` for single-segment roots.
    pub fn parent(&self) -> Option<NodePath> {
        if self.parts.len() < 2 {
            return None;
        }
        Some(NodePath {
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    /// Append a single segment.
    pub fn child(&self, name: &str) -> NodePath {
        let mut parts = self.parts.clone();
        parts.push(name.replace('.', "_"));
        NodePath { parts }
    }

    /// Concatenate two paths (wildcard import + simple name resolution).
    pub fn join(&self, other: &NodePath) -> NodePath {
        let mut parts = self.parts.clone();
        parts.extend(other.parts.iter().cloned());
        NodePath { parts }
    }

    pub fn dotted(&self) -> String {
        self.parts.join(".")
    }

    /// True when `self` is an ancestor of `other` or equal to it.
    pub fn contains(&self, other: &NodePath) -> bool {
        other.parts.len() >= self.parts.len() && other.parts[..self.parts.len()] == self.parts[..]
    }
}

/// Prefix containment on dotted id strings, for the view side where ids are
/// carried as plain strings. `contains_id("a.b", "a.b.c")` is true,
/// `contains_id("a.b", "a.bc")` is not.
pub fn contains_id(ancestor: &str, id: &str) -> bool {
    id == ancestor || (id.len() > ancestor.len() && id.starts_with(ancestor) && id.as_bytes()[ancestor.len()] == b'.')
}

/// The parent of a dotted id string, or `None` for roots.
pub fn parent_id(id: &str) -> Option<&str> {
    id.rfind('.').map(|i| &id[..i])
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

impl Serialize for NodePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.dotted())
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let dotted = String::deserialize(deserializer)?;
        Ok(NodePath::from_dotted(&dotted))
    }
}
