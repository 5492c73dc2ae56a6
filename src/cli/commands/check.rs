//! Check command - dry-run classification of a single path.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::watcher::{PathClassifier, Verdict};

/// Classify `path` and print the command set that would run.
///
/// Existing paths are stat'ed; paths that do not exist yet are assumed to be
/// directories unless `as_file` is set.
pub fn run(settings: &Settings, path: &Path, as_file: bool) {
    let root = match settings.watch_root() {
        Ok(root) => root.canonicalize().unwrap_or(root),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let target = resolve_target(&root, path);
    let is_directory = match std::fs::metadata(&target) {
        Ok(metadata) => metadata.is_dir(),
        Err(_) => !as_file,
    };

    let classifier = PathClassifier::new(root, Arc::new(settings.categories.clone()));
    let display = classifier
        .path_chunks(&target)
        .map(|chunks| chunks.join("/"))
        .unwrap_or_else(|| target.display().to_string());

    match classifier.classify(&target, is_directory) {
        Verdict::Accepted(qualified) => {
            println!("{display}: new {} project", qualified.category);
            for command in settings.commands.resolve(&qualified.category) {
                println!("  would run: {command}");
            }
        }
        Verdict::Rejected(reason) => {
            println!("{display}: skipped ({reason})");
        }
    }
}

/// Relative paths are taken relative to the watched root.
fn resolve_target(root: &Path, path: &Path) -> PathBuf {
    let target = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    };
    target.canonicalize().unwrap_or(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_paths_join_root() {
        let target = resolve_target(Path::new("/nonexistent/root"), Path::new("Go/app"));
        assert_eq!(target, PathBuf::from("/nonexistent/root/Go/app"));
    }

    #[test]
    fn test_absolute_paths_kept() {
        let target = resolve_target(Path::new("/nonexistent/root"), Path::new("/elsewhere/app"));
        assert_eq!(target, PathBuf::from("/elsewhere/app"));
    }
}
