//! Decides whether a created path is a new project directory.
//!
//! Filtering order:
//! 1. Only directories qualify
//! 2. The path must lie strictly below the watched root
//! 3. The first segment must be a configured category
//! 4. The segment count must equal the category depth
//! 5. No segment may be an excluded name
//! 6. The leaf must not be hidden (leading `.`)

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::category::CategoryRegistry;

/// A directory that should be initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualified {
    pub category: String,
    pub path: PathBuf,
}

/// Why a path did not qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    NotADirectory,
    OutsideRoot,
    UnknownCategory(String),
    DepthMismatch {
        category: String,
        expected: usize,
        observed: usize,
    },
    Excluded {
        category: String,
        name: String,
    },
    Hidden(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotADirectory => write!(f, "not a directory"),
            Self::OutsideRoot => write!(f, "not below the watched root"),
            Self::UnknownCategory(category) => write!(f, "no rule for category '{category}'"),
            Self::DepthMismatch {
                category,
                expected,
                observed,
            } => write!(
                f,
                "depth {observed} does not match {category} depth {expected}"
            ),
            Self::Excluded { category, name } => {
                write!(f, "'{name}' is excluded for {category}")
            }
            Self::Hidden(name) => write!(f, "'{name}' is hidden"),
        }
    }
}

/// Classification result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted(Qualified),
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

/// Pure path classifier over a fixed root and category registry.
#[derive(Debug, Clone)]
pub struct PathClassifier {
    root: PathBuf,
    categories: Arc<CategoryRegistry>,
}

impl PathClassifier {
    pub fn new(root: impl Into<PathBuf>, categories: Arc<CategoryRegistry>) -> Self {
        Self {
            root: root.into(),
            categories,
        }
    }

    /// Split `path` into segment names relative to the root.
    ///
    /// Returns `None` for paths outside the root, the root itself, and paths
    /// with `.`/`..` components.
    pub fn path_chunks(&self, path: &Path) -> Option<Vec<String>> {
        let relative = path.strip_prefix(&self.root).ok()?;

        let chunks = relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()?;

        if chunks.is_empty() { None } else { Some(chunks) }
    }

    /// Classify a created entry.
    pub fn classify(&self, path: &Path, is_directory: bool) -> Verdict {
        if !is_directory {
            return Verdict::Rejected(Rejection::NotADirectory);
        }

        let Some(chunks) = self.path_chunks(path) else {
            return Verdict::Rejected(Rejection::OutsideRoot);
        };

        let category = &chunks[0];
        let Some(rule) = self.categories.get(category) else {
            return Verdict::Rejected(Rejection::UnknownCategory(category.clone()));
        };

        if chunks.len() != rule.depth {
            return Verdict::Rejected(Rejection::DepthMismatch {
                category: category.clone(),
                expected: rule.depth,
                observed: chunks.len(),
            });
        }

        if let Some(name) = chunks.iter().find(|chunk| rule.is_excluded(chunk)) {
            return Verdict::Rejected(Rejection::Excluded {
                category: category.clone(),
                name: name.clone(),
            });
        }

        // chunks is non-empty, so last() is the leaf
        if let Some(leaf) = chunks.last().filter(|leaf| leaf.starts_with('.')) {
            return Verdict::Rejected(Rejection::Hidden(leaf.clone()));
        }

        Verdict::Accepted(Qualified {
            category: category.clone(),
            path: path.to_path_buf(),
        })
    }
}
