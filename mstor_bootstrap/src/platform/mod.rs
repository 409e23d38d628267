//! OS abstraction behind a trait, the way the rest of the pack keeps
//! platform-specific syscalls out of the composition root. Only the Unix
//! arm is implemented: the pack's Windows platform file was never
//! retrieved, and the rest of this codebase already skews POSIX (uid/gid
//! permission checks have no Windows analogue).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform operation not supported: {0}")]
    NotSupported(String),
    #[error("platform error: {0}")]
    Other(String),
}

/// Process-environment facts `main` logs at startup and may use to pick
/// defaults (e.g. scaling the RocksDB cache to available memory).
pub trait Platform: Send + Sync {
    fn cpu_count(&self) -> usize;
    fn is_elevated(&self) -> bool;
    fn platform_name(&self) -> &'static str;
    fn temp_dir(&self) -> PathBuf;
}

#[cfg(unix)]
pub mod unix;

#[cfg(unix)]
pub use unix::UnixPlatform;

/// Construct the platform abstraction for the host this binary is
/// running on.
pub fn create_platform() -> Box<dyn Platform> {
    #[cfg(unix)]
    {
        Box::new(UnixPlatform::new())
    }
    #[cfg(not(unix))]
    {
        compile_error!("mstor_bootstrap only implements the Unix platform arm");
    }
}
