//! # codeinit
//!
//! Watches a code folder tree (by default `<home>/Code`) and initializes
//! tooling in newly created project directories.
//!
//! The first path segment under the root is the *category* (`Go`, `Rust`,
//! ...). When a directory is created at the category's configured depth, is
//! not under an excluded name and is not hidden, the category's command set
//! runs inside it (e.g. `go mod init` then `git init`).
//!
//! ```text
//! filesystem -> ChangeEventSource -> WatchLoop -> PathClassifier
//!                                        |
//!                                        v
//!                                    Dispatcher -> external commands
//! ```

pub mod category;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod platform;
pub mod watcher;

pub use category::{CategoryRegistry, CategoryRule};
pub use config::{ConfigError, Settings};
pub use dispatch::{
    CommandRegistry, CommandRunner, DispatchReport, Dispatcher, InitCommand, ProcessRunner,
};
pub use watcher::{ChangeEvent, ChangeEventSource, PathClassifier, Verdict, WatchError, WatchLoop};
