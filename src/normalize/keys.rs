//! Key humanization.

use regex::Regex;

/// Turns machine keys such as `offenderNo` or `SAR_CASE_ID` into
/// sentence-case labels.
#[derive(Debug, Clone)]
pub struct KeyHumanizer {
    camel_boundary: Regex,
    acronym_boundary: Regex,
    separators: Regex,
}

impl KeyHumanizer {
    pub fn new() -> Self {
        Self {
            camel_boundary: Regex::new(r"([a-z0-9])([A-Z])").unwrap(),
            acronym_boundary: Regex::new(r"([A-Z]+)([A-Z][a-z])").unwrap(),
            separators: Regex::new(r"[_\-.\s]+").unwrap(),
        }
    }

    /// Humanize one key.
    ///
    /// Words are split on case boundaries and separators, lower-cased, and
    /// the first letter of the result is upper-cased. A key with no words
    /// in it is returned unchanged.
    pub fn humanize(&self, key: &str) -> String {
        let spaced = self.camel_boundary.replace_all(key, "$1 $2");
        let spaced = self.acronym_boundary.replace_all(&spaced, "$1 $2");
        let spaced = self.separators.replace_all(&spaced, " ");
        let lowered = spaced.trim().to_lowercase();

        let mut chars = lowered.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => key.to_string(),
        }
    }
}

impl Default for KeyHumanizer {
    fn default() -> Self {
        Self::new()
    }
}
