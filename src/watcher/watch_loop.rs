//! The long-running event -> classify -> dispatch loop.

use std::fmt;
use std::future::Future;

use tokio::sync::mpsc;

use crate::dispatch::{DispatchReport, Dispatcher};

use super::classifier::{PathClassifier, Verdict};
use super::event::ChangeEvent;

/// Counters for one run of the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Events pulled from the queue.
    pub received: usize,
    /// Events whose path could not be stat'ed.
    pub stat_failures: usize,
    /// Events the classifier rejected.
    pub skipped: usize,
    /// Directories that were initialized.
    pub dispatched: usize,
    /// Individual commands that failed across all dispatches.
    pub failed_commands: usize,
}

impl fmt::Display for LoopStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} events, {} initialized, {} skipped, {} vanished, {} failed commands",
            self.received, self.dispatched, self.skipped, self.stat_failures, self.failed_commands
        )
    }
}

/// Single-consumer watch loop.
///
/// Dispatch is awaited inline: no further events are pulled while a
/// directory's commands run. Every per-event failure is logged and the loop
/// moves on.
pub struct WatchLoop {
    events: mpsc::Receiver<ChangeEvent>,
    classifier: PathClassifier,
    dispatcher: Dispatcher,
    stats: LoopStats,
}

impl WatchLoop {
    pub fn new(
        events: mpsc::Receiver<ChangeEvent>,
        classifier: PathClassifier,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            events,
            classifier,
            dispatcher,
            stats: LoopStats::default(),
        }
    }

    /// Run until the event queue closes.
    pub async fn run(self) -> LoopStats {
        self.run_until(std::future::pending()).await
    }

    /// Run until the event queue closes or `shutdown` resolves.
    pub async fn run_until<F>(mut self, shutdown: F) -> LoopStats
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                next = self.events.recv() => match next {
                    Some(event) => {
                        self.process_event(event).await;
                    }
                    None => {
                        crate::debug_event!("watcher", "event queue closed");
                        break;
                    }
                },
                _ = &mut shutdown => {
                    crate::log_event!("watcher", "shutdown requested");
                    break;
                }
            }
        }

        self.stats
    }

    /// Handle one event end to end.
    ///
    /// Returns the dispatch report when the event qualified.
    pub async fn process_event(&mut self, event: ChangeEvent) -> Option<DispatchReport> {
        self.stats.received += 1;

        let reported = event.path.clone();
        let event = match event.confirm().await {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("[watcher] cannot stat {}: {e}", reported.display());
                self.stats.stat_failures += 1;
                return None;
            }
        };

        let qualified = match self.classifier.classify(&event.path, event.is_directory) {
            Verdict::Accepted(qualified) => qualified,
            Verdict::Rejected(reason) => {
                crate::debug_event!("classifier", "skipped", "{} ({reason})", event.path.display());
                self.stats.skipped += 1;
                return None;
            }
        };

        crate::log_event!(&qualified.category, "new project", "{}", qualified.path.display());

        let report = self
            .dispatcher
            .dispatch(&qualified.path, &qualified.category)
            .await;

        self.stats.dispatched += 1;
        self.stats.failed_commands += report.failed_count();

        if report.succeeded() {
            crate::log_event!(&report.category, "initialized", "{report}");
        } else {
            tracing::warn!("[{}] initialized with errors: {report}", report.category);
        }

        Some(report)
    }

    /// Counters so far.
    pub fn stats(&self) -> &LoopStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryRegistry, CategoryRule};
    use crate::dispatch::{CommandRegistry, CommandRunner, DispatchError, InitCommand};
    use async_trait::async_trait;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        calls: Mutex<Vec<(String, PathBuf)>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(
            &self,
            command: &InitCommand,
            working_dir: &Path,
        ) -> Result<(), DispatchError> {
            self.calls
                .lock()
                .unwrap()
                .push((command.to_string(), working_dir.to_path_buf()));
            Ok(())
        }
    }

    struct Fixture {
        _temp_dir: TempDir,
        root: PathBuf,
        runner: Arc<RecordingRunner>,
        tx: mpsc::Sender<ChangeEvent>,
        watch_loop: WatchLoop,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();

        let categories = CategoryRegistry::new()
            .with_rule("Go", CategoryRule::new(2).exclude("vendor"))
            .with_rule("Notes", CategoryRule::new(2));
        let runner = Arc::new(RecordingRunner::default());
        let dispatcher = Dispatcher::new(Arc::new(CommandRegistry::default()), runner.clone());
        let classifier = PathClassifier::new(&root, Arc::new(categories));

        let (tx, rx) = mpsc::channel(8);
        Fixture {
            _temp_dir: temp_dir,
            root,
            runner,
            tx,
            watch_loop: WatchLoop::new(rx, classifier, dispatcher),
        }
    }

    fn mkdir(path: &Path) -> ChangeEvent {
        std::fs::create_dir_all(path).unwrap();
        ChangeEvent::new(path, true)
    }

    #[tokio::test]
    async fn test_qualifying_directory_dispatches_once_in_order() {
        let mut f = fixture();
        let app = f.root.join("Go").join("myapp");

        let report = f.watch_loop.process_event(mkdir(&app)).await.unwrap();

        assert!(report.succeeded());
        assert_eq!(report.category, "Go");
        let calls = f.runner.calls.lock().unwrap();
        assert_eq!(
            calls.iter().map(|(c, _)| c.as_str()).collect::<Vec<_>>(),
            vec!["go mod init", "git init"]
        );
        assert!(calls.iter().all(|(_, dir)| dir == &app));
    }

    #[tokio::test]
    async fn test_category_without_command_set_uses_default() {
        let mut f = fixture();
        let notes = f.root.join("Notes").join("ideas");

        let report = f.watch_loop.process_event(mkdir(&notes)).await.unwrap();

        let commands: Vec<String> = report.commands().map(ToString::to_string).collect();
        assert_eq!(commands, vec!["git init"]);
    }

    #[tokio::test]
    async fn test_vanished_path_is_skipped() {
        let mut f = fixture();
        let gone = ChangeEvent::new(f.root.join("Go").join("gone"), true);

        assert!(f.watch_loop.process_event(gone).await.is_none());
        assert_eq!(f.watch_loop.stats().stat_failures, 1);
        assert!(f.runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_stat_overrides_directory_hint() {
        let mut f = fixture();
        let go = f.root.join("Go");
        std::fs::create_dir_all(&go).unwrap();
        let file = go.join("notes");
        std::fs::write(&file, "not a project").unwrap();

        let report = f
            .watch_loop
            .process_event(ChangeEvent::new(&file, true))
            .await;

        assert!(report.is_none());
        assert_eq!(f.watch_loop.stats().skipped, 1);
    }

    #[tokio::test]
    async fn test_rejected_paths_never_dispatch() {
        let mut f = fixture();
        let events = vec![
            mkdir(&f.root.join("Go").join("vendor")),
            mkdir(&f.root.join("Go").join(".hidden")),
            mkdir(&f.root.join("Go").join("app").join("internal")),
            mkdir(&f.root.join("Python").join("tool")),
        ];

        for event in events {
            assert!(f.watch_loop.process_event(event).await.is_none());
        }
        assert!(f.runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_drains_queue_until_closed() {
        let f = fixture();
        let first = mkdir(&f.root.join("Go").join("one"));
        let second = mkdir(&f.root.join("Go").join("two"));

        f.tx.send(first).await.unwrap();
        f.tx.send(second).await.unwrap();
        drop(f.tx);

        let stats = f.watch_loop.run().await;

        assert_eq!(stats.received, 2);
        assert_eq!(stats.dispatched, 2);
        let calls = f.runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls[0].1.ends_with("one"));
        assert!(calls[2].1.ends_with("two"));
    }

    #[tokio::test]
    async fn test_run_until_stops_on_shutdown() {
        let f = fixture();
        let _keep_open = f.tx.clone();

        let stats = f.watch_loop.run_until(async {}).await;

        assert_eq!(stats, LoopStats::default());
    }
}
