//! Watch command - the long-running initialization pipeline.

use std::sync::Arc;

use anyhow::Context;

use crate::config::Settings;
use crate::dispatch::{Dispatcher, ProcessRunner};
use crate::watcher::{ChangeEventSource, PathClassifier, WatchLoop};

/// Run the watch loop until Ctrl-C or until the subscription closes.
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let root = settings.watch_root()?;
    let root = root
        .canonicalize()
        .with_context(|| format!("watch root {} is not accessible", root.display()))?;

    if settings.categories.is_empty() {
        tracing::warn!("[watcher] no categories configured; nothing will be initialized");
    }

    let (source, events) = ChangeEventSource::subscribe(&root, settings.queue_capacity)?;

    let classifier = PathClassifier::new(root.clone(), Arc::new(settings.categories.clone()));
    let runner = ProcessRunner::new().with_timeout(settings.command_timeout());
    let dispatcher = Dispatcher::new(Arc::new(settings.commands.clone()), Arc::new(runner));

    crate::log_event!(
        "watcher",
        "started",
        "{} ({} categories: {})",
        root.display(),
        settings.categories.len(),
        settings.categories.names().collect::<Vec<_>>().join(", ")
    );

    let stats = WatchLoop::new(events, classifier, dispatcher)
        .run_until(shutdown_signal())
        .await;

    source.stop();
    crate::log_event!("watcher", "stopped", "{stats}");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[watcher] cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
