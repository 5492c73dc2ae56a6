//! Filesystem watching for new project directories.
//!
//! # Architecture
//!
//! ```text
//! ChangeEventSource
//!   - Single notify::RecommendedWatcher (recursive)
//!   - Bounded queue of ChangeEvent
//!         |
//!      WatchLoop
//!   - stat -> PathClassifier -> Dispatcher
//! ```

mod classifier;
mod error;
mod event;
mod source;
mod watch_loop;

pub use classifier::{PathClassifier, Qualified, Rejection, Verdict};
pub use error::WatchError;
pub use event::ChangeEvent;
pub use source::ChangeEventSource;
pub use watch_loop::{LoopStats, WatchLoop};
