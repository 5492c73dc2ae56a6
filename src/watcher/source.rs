//! Recursive subscription to "entry created" notifications.

use std::path::{Path, PathBuf};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::error::WatchError;
use super::event::ChangeEvent;

/// Live subscription to creation events under a root directory.
///
/// Events are forwarded in the order the backend reports them through a
/// bounded queue. The notify callback never blocks: when the queue is full
/// the event is dropped and a warning is logged. Dropping the source (or
/// calling [`ChangeEventSource::stop`]) closes the queue.
pub struct ChangeEventSource {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

impl ChangeEventSource {
    /// Subscribe to every creation under `root`, recursively.
    ///
    /// Returns the subscription handle, which must be kept alive, and the
    /// receiving end of the event queue.
    pub fn subscribe(
        root: &Path,
        capacity: usize,
    ) -> Result<(Self, mpsc::Receiver<ChangeEvent>), WatchError> {
        if capacity == 0 {
            return Err(WatchError::InvalidCapacity);
        }

        let (tx, rx) = mpsc::channel(capacity);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            forward(res, &tx);
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        crate::log_event!("watcher", "subscribed", "{} (queue {capacity})", root.display());

        Ok((
            Self {
                watcher,
                root: root.to_path_buf(),
            },
            rx,
        ))
    }

    /// Release the subscription.
    pub fn stop(mut self) {
        if let Err(e) = self.watcher.unwatch(&self.root) {
            tracing::warn!("[watcher] failed to unwatch {}: {e}", self.root.display());
        }
        crate::log_event!("watcher", "unsubscribed", "{}", self.root.display());
    }
}

/// Push creation events from one notify callback into the queue.
fn forward(res: notify::Result<Event>, tx: &mpsc::Sender<ChangeEvent>) {
    let event = match res {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("[watcher] file watch error: {e}");
            return;
        }
    };

    for change in ChangeEvent::from_notify(event) {
        match tx.try_send(change) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(
                    "[watcher] event queue full, dropped {}",
                    dropped.path.display()
                );
            }
            Err(TrySendError::Closed(_)) => {
                crate::debug_event!("watcher", "queue closed");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::EventKind;
    use notify::event::CreateKind;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_forward_drops_when_full() {
        let (tx, mut rx) = mpsc::channel(1);
        let event = Event::new(EventKind::Create(CreateKind::Folder))
            .add_path(PathBuf::from("/code/Go/first"))
            .add_path(PathBuf::from("/code/Go/second"));

        forward(Ok(event), &tx);

        assert_eq!(rx.try_recv().unwrap().path, Path::new("/code/Go/first"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let result = ChangeEventSource::subscribe(temp_dir.path(), 0);
        assert!(matches!(result, Err(WatchError::InvalidCapacity)));
    }

    #[test]
    fn test_missing_root_fails() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let result = ChangeEventSource::subscribe(&missing, 8);
        assert!(matches!(result, Err(WatchError::PathWatchFailed { .. })));
    }

    #[tokio::test]
    async fn test_reports_created_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let (source, mut rx) = ChangeEventSource::subscribe(&root, 16).unwrap();

        let created = root.join("Go");
        std::fs::create_dir(&created).unwrap();

        let event = tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                match rx.recv().await {
                    Some(event) if event.path == created => return Some(event),
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .unwrap();

        assert!(event.is_some());
        source.stop();
    }
}
