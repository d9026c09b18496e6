//! Content trees captured from upstream services.

use serde::Deserialize;
use serde_json::{Map, Number, Value};
use std::fmt;

/// Text that replaces null, missing and empty values.
pub const NO_DATA_HELD: &str = "No data held";

/// A leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Number(Number),
    Boolean(bool),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(s) => Value::String(s),
            Scalar::Number(n) => Value::Number(n),
            Scalar::Boolean(b) => Value::Bool(b),
        }
    }
}

/// One service's raw response data.
///
/// Mapping entries keep the order the service returned them in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum ContentNode {
    Null,
    Scalar(Scalar),
    Sequence(Vec<ContentNode>),
    Mapping(Vec<(String, ContentNode)>),
}

impl ContentNode {
    /// Build a text scalar.
    pub fn text(s: impl Into<String>) -> Self {
        ContentNode::Scalar(Scalar::Text(s.into()))
    }

    /// Parse a JSON document into a content tree.
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Value>(json).map(Self::from)
    }
}

impl From<Value> for ContentNode {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ContentNode::Null,
            Value::Bool(b) => ContentNode::Scalar(Scalar::Boolean(b)),
            Value::Number(n) => ContentNode::Scalar(Scalar::Number(n)),
            Value::String(s) => ContentNode::Scalar(Scalar::Text(s)),
            Value::Array(items) => {
                ContentNode::Sequence(items.into_iter().map(ContentNode::from).collect())
            }
            Value::Object(map) => ContentNode::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, ContentNode::from(v)))
                    .collect(),
            ),
        }
    }
}

/// A content tree after normalization.
///
/// There is no null variant: every absent or empty value has become the
/// [`NO_DATA_HELD`] sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedNode {
    Scalar(Scalar),
    Sequence(Vec<NormalizedNode>),
    Mapping(Vec<(String, NormalizedNode)>),
}

impl NormalizedNode {
    pub fn sentinel() -> Self {
        NormalizedNode::Scalar(Scalar::Text(NO_DATA_HELD.to_string()))
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, NormalizedNode::Scalar(Scalar::Text(s)) if s == NO_DATA_HELD)
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, NormalizedNode::Scalar(_))
    }

    /// Look up a mapping entry by its humanized key.
    pub fn get(&self, key: &str) -> Option<&NormalizedNode> {
        match self {
            NormalizedNode::Mapping(entries) => {
                entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
            }
            _ => None,
        }
    }

    /// Convert into JSON for display or export.
    pub fn to_json(&self) -> Value {
        match self {
            NormalizedNode::Scalar(s) => s.clone().into(),
            NormalizedNode::Sequence(items) => {
                Value::Array(items.iter().map(NormalizedNode::to_json).collect())
            }
            NormalizedNode::Mapping(entries) => {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.clone(), v.to_json());
                }
                Value::Object(map)
            }
        }
    }
}

impl From<NormalizedNode> for ContentNode {
    fn from(node: NormalizedNode) -> Self {
        match node {
            NormalizedNode::Scalar(s) => ContentNode::Scalar(s),
            NormalizedNode::Sequence(items) => {
                ContentNode::Sequence(items.into_iter().map(ContentNode::from).collect())
            }
            NormalizedNode::Mapping(entries) => ContentNode::Mapping(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, ContentNode::from(v)))
                    .collect(),
            ),
        }
    }
}
