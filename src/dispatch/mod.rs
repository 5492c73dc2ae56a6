//! Initializer dispatch: run a category's command set inside a new project.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher
//!   - CommandRegistry (category -> [InitCommand], plus a default set)
//!   - CommandRunner   (ProcessRunner in production)
//!         |
//!   for each InitCommand, in order:
//!     runner.run(command, target_dir)  -- failures logged, next command runs
//! ```

mod command;
mod dispatcher;
mod error;
mod runner;

pub use command::{CommandRegistry, InitCommand};
pub use dispatcher::{CommandOutcome, DispatchReport, Dispatcher};
pub use error::DispatchError;
pub use runner::{CommandRunner, ProcessRunner};
