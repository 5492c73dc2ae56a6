//! Platform gate.
//!
//! Only Unix-like systems are supported; anything else is refused before a
//! watch subscription is attempted.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unsupported platform: {os} (codeinit only runs on Unix-like systems)")]
pub struct PlatformError {
    pub os: &'static str,
}

/// Fail unless running on a Unix-like target.
pub fn ensure_supported() -> Result<(), PlatformError> {
    check(cfg!(unix), std::env::consts::OS)
}

fn check(is_unix: bool, os: &'static str) -> Result<(), PlatformError> {
    if is_unix {
        Ok(())
    } else {
        Err(PlatformError { os })
    }
}
