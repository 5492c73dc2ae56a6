//! Filesystem creation events.

use std::path::PathBuf;

use notify::event::CreateKind;
use notify::{Event, EventKind};

/// A single observed filesystem creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Absolute path of the created entry.
    pub path: PathBuf,

    /// Whether the entry is a directory.
    ///
    /// From the notify backend this is only a hint; [`ChangeEvent::confirm`]
    /// replaces it with what the filesystem reports.
    pub is_directory: bool,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, is_directory: bool) -> Self {
        Self {
            path: path.into(),
            is_directory,
        }
    }

    /// Convert a notify event into creation events, one per path.
    ///
    /// Anything other than a create notification yields nothing.
    pub fn from_notify(event: Event) -> Vec<Self> {
        let EventKind::Create(kind) = event.kind else {
            return Vec::new();
        };
        let is_directory = matches!(kind, CreateKind::Folder);

        event
            .paths
            .into_iter()
            .map(|path| Self { path, is_directory })
            .collect()
    }

    /// Stat the path and refresh `is_directory`.
    ///
    /// Fails when the entry is already gone.
    pub async fn confirm(self) -> std::io::Result<Self> {
        let metadata = tokio::fs::metadata(&self.path).await?;
        Ok(Self {
            is_directory: metadata.is_dir(),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{ModifyKind, RemoveKind};
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_create_folder_event() {
        let event = Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/code/Go/a"))
            .add_path(PathBuf::from("/code/Go/b"));

        let events = ChangeEvent::from_notify(event);
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.is_directory));
        assert_eq!(events[1].path, Path::new("/code/Go/b"));
    }

    #[test]
    fn test_create_file_event_is_not_directory() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/code/Go/main.go"));

        let events = ChangeEvent::from_notify(event);
        assert_eq!(events, vec![ChangeEvent::new("/code/Go/main.go", false)]);
    }

    #[test]
    fn test_non_create_events_ignored() {
        let modify =
            Event::new(EventKind::Modify(ModifyKind::Any)).add_path(PathBuf::from("/x"));
        let remove =
            Event::new(EventKind::Remove(RemoveKind::Folder)).add_path(PathBuf::from("/x"));

        assert!(ChangeEvent::from_notify(modify).is_empty());
        assert!(ChangeEvent::from_notify(remove).is_empty());
    }

    #[tokio::test]
    async fn test_confirm_reads_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("project");
        std::fs::create_dir(&dir).unwrap();

        // CreateKind::Any backends report no kind; stat decides.
        let confirmed = ChangeEvent::new(&dir, false).confirm().await.unwrap();
        assert!(confirmed.is_directory);

        let gone = ChangeEvent::new(temp_dir.path().join("gone"), true).confirm().await;
        assert!(gone.is_err());
    }
}
