//! Category rules keyed by the first path segment under the watched root.
//!
//! A category (e.g. `Go` in `~/Code/Go/myapp`) owns a depth and a set of
//! excluded directory names. The store is built once at startup and shared
//! read-only afterwards.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Matching rule for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    /// Number of path segments (relative to the watched root, category
    /// segment included) at which a new directory counts as a project root.
    pub depth: usize,

    /// Segment names that disqualify a path wherever they appear in it.
    #[serde(default)]
    pub excluded_dirs: BTreeSet<String>,
}

impl CategoryRule {
    /// Create a rule with no exclusions.
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            excluded_dirs: BTreeSet::new(),
        }
    }

    /// Add an excluded directory name.
    pub fn exclude(mut self, name: impl Into<String>) -> Self {
        self.excluded_dirs.insert(name.into());
        self
    }

    /// Check whether a segment name is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_dirs.contains(name)
    }
}

/// Immutable store of category rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryRegistry {
    rules: BTreeMap<String, CategoryRule>,
}

impl CategoryRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a category.
    pub fn with_rule(mut self, category: impl Into<String>, rule: CategoryRule) -> Self {
        self.rules.insert(category.into(), rule);
        self
    }

    /// Get the rule for a category.
    pub fn get(&self, category: &str) -> Option<&CategoryRule> {
        self.rules.get(category)
    }

    /// Category names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Iterate over `(category, rule)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<BTreeMap<String, CategoryRule>> for CategoryRegistry {
    fn from(rules: BTreeMap<String, CategoryRule>) -> Self {
        Self { rules }
    }
}
