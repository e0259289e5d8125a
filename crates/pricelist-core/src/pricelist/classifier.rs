//! Line classification and category tracking.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::models::config::ClassifierConfig;
use super::rules::PRODUCT_PREFIX;

/// Category header most recently seen in the current document pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryState {
    current: String,
}

impl CategoryState {
    /// Fresh state for a new document; no category yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// The category in effect, empty before the first header.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Whether a header has been seen.
    pub fn is_set(&self) -> bool {
        !self.current.is_empty()
    }

    fn set(&mut self, category: &str) {
        self.current.clear();
        self.current.push_str(category);
    }
}

/// What a raw line turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Starts a new category; the state was updated.
    CategoryHeader,
    /// Starts with a product code; hand over to a line parser.
    ProductCandidate,
    /// Anything else.
    Noise,
}

/// Decides whether a line is a category header, a product candidate or noise.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    min_header_len: usize,
    max_header_len: usize,
    denylist: HashSet<String>,
}

impl LineClassifier {
    /// Create a classifier with default settings.
    pub fn new() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }

    /// Create a classifier from configuration.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            min_header_len: config.min_header_len,
            max_header_len: config.max_header_len,
            denylist: config.denylist.iter().map(|s| s.trim().to_string()).collect(),
        }
    }

    /// Add a boilerplate line that must never become a category.
    pub fn with_denied(mut self, line: impl Into<String>) -> Self {
        self.denylist.insert(line.into().trim().to_string());
        self
    }

    /// Classify a line, updating `state` when it is a category header.
    pub fn classify(&self, line: &str, state: &mut CategoryState) -> LineKind {
        let line = line.trim();

        if self.is_header(line) {
            trace!("Category header: {}", line);
            state.set(line);
            return LineKind::CategoryHeader;
        }

        if is_product_candidate(line) {
            return LineKind::ProductCandidate;
        }

        LineKind::Noise
    }

    /// Header test on an already trimmed line.
    pub fn is_header(&self, line: &str) -> bool {
        let len = line.chars().count();
        len > self.min_header_len
            && len < self.max_header_len
            && is_upper_shape(line)
            && !self.denylist.contains(line)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// No digits, no lower-case letters, and at least one upper-case letter.
///
/// Only letters with a case mapping count as lower-case, so ordinal
/// indicators such as `ª` and `º` are neutral like punctuation.
pub fn is_upper_shape(line: &str) -> bool {
    let mut has_upper = false;
    for c in line.chars() {
        if c.is_numeric() || is_cased_lowercase(c) {
            return false;
        }
        has_upper |= c.is_uppercase();
    }
    has_upper
}

fn is_cased_lowercase(c: char) -> bool {
    c.is_lowercase() && !c.to_uppercase().eq(std::iter::once(c))
}

/// A trimmed line starting with a 1-5 digit code followed by whitespace.
pub fn is_product_candidate(line: &str) -> bool {
    PRODUCT_PREFIX.is_match(line)
}
