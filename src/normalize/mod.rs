//! Normalization of service content for display.
//!
//! A [`ContentNode`] tree is walked recursively to produce a
//! [`NormalizedNode`] tree:
//!
//! - mapping keys are humanized (`offenderNo` becomes `Offender no`)
//! - null, `"null"`, blank text, empty sequences and empty mappings become
//!   the "No data held" sentinel
//! - text that looks like a date or date-time is rewritten to a single
//!   display format
//!
//! Numbers and booleans pass through untouched. Normalization never fails.
//!
//! # Example
//!
//! ```
//! use sarpdf::model::ContentNode;
//! use sarpdf::normalize::normalize;
//!
//! let node = ContentNode::from_json_str(r#"{"releaseDate": "2024-01-05", "alerts": []}"#).unwrap();
//! let normalized = normalize(&node);
//! assert_eq!(normalized.to_json(), serde_json::json!({
//!     "Release date": "5 January 2024",
//!     "Alerts": "No data held"
//! }));
//! ```

mod dates;
mod keys;

pub use dates::{format_date_like, DATE_FORMAT, DATE_TIME_MINUTES_FORMAT, DATE_TIME_SECONDS_FORMAT};
pub use keys::KeyHumanizer;

use crate::model::{ContentNode, NormalizedNode, Scalar};
use std::sync::OnceLock;

/// Recursive content normalizer.
///
/// Holds the compiled key patterns so that one instance can be reused
/// across many services.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    keys: KeyHumanizer,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a content tree.
    pub fn normalize(&self, node: &ContentNode) -> NormalizedNode {
        match node {
            ContentNode::Null => NormalizedNode::sentinel(),
            ContentNode::Scalar(scalar) => self.normalize_scalar(scalar),
            ContentNode::Sequence(items) if items.is_empty() => NormalizedNode::sentinel(),
            ContentNode::Sequence(items) => {
                NormalizedNode::Sequence(items.iter().map(|item| self.normalize(item)).collect())
            }
            ContentNode::Mapping(entries) if entries.is_empty() => NormalizedNode::sentinel(),
            ContentNode::Mapping(entries) => NormalizedNode::Mapping(
                entries
                    .iter()
                    .map(|(key, value)| (self.keys.humanize(key), self.normalize(value)))
                    .collect(),
            ),
        }
    }

    /// Normalize optional content; a service that returned nothing
    /// normalizes to the sentinel.
    pub fn normalize_optional(&self, node: Option<&ContentNode>) -> NormalizedNode {
        node.map_or_else(NormalizedNode::sentinel, |n| self.normalize(n))
    }

    pub fn humanize_key(&self, key: &str) -> String {
        self.keys.humanize(key)
    }

    fn normalize_scalar(&self, scalar: &Scalar) -> NormalizedNode {
        match scalar {
            Scalar::Text(text) if is_absent(text) => NormalizedNode::sentinel(),
            Scalar::Text(text) => match format_date_like(text) {
                Some(display) => NormalizedNode::Scalar(Scalar::Text(display)),
                None => NormalizedNode::Scalar(scalar.clone()),
            },
            Scalar::Number(_) | Scalar::Boolean(_) => NormalizedNode::Scalar(scalar.clone()),
        }
    }
}

/// The literal text `null` is treated as an absent value.
fn is_absent(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == "null"
}

/// Normalize with a shared [`Normalizer`].
pub fn normalize(node: &ContentNode) -> NormalizedNode {
    static SHARED: OnceLock<Normalizer> = OnceLock::new();
    SHARED.get_or_init(Normalizer::new).normalize(node)
}
