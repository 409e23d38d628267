//! Graceful-shutdown signal handling.
//!
//! `mstor` has no network listener and no async runtime (the store itself
//! is synchronous top to bottom, see `mstor::application::services::Mstor`),
//! so unlike the pack's tokio-based signal handlers this one blocks the
//! calling thread on `signal_hook`'s iterator rather than awaiting a
//! future. The trait exists for the same reason the pack keeps one: tests
//! substitute a handler that never fires instead of sending real signals
//! to the test process.

use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
use signal_hook::iterator::Signals;

/// Which signal ended the wait, so `main` can log and pick an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Term,
    Int,
    Hup,
}

pub trait SystemSignals: Send + Sync {
    /// Block until a shutdown signal arrives, then return which one.
    fn wait_for_signal(&self) -> std::io::Result<ShutdownSignal>;
}

/// Blocks on SIGTERM, SIGINT, and SIGHUP via `signal_hook`.
pub struct UnixSignalHandler;

impl UnixSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for UnixSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignals for UnixSignalHandler {
    fn wait_for_signal(&self) -> std::io::Result<ShutdownSignal> {
        let mut signals = Signals::new([SIGTERM, SIGINT, SIGHUP])?;
        for sig in signals.forever() {
            return Ok(match sig {
                SIGTERM => ShutdownSignal::Term,
                SIGINT => ShutdownSignal::Int,
                SIGHUP => ShutdownSignal::Hup,
                other => unreachable!("signal {other} was never registered"),
            });
        }
        unreachable!("Signals::forever() never returns None")
    }
}

/// Never fires. Lets tests exercise the rest of `main`'s lifecycle without
/// depending on a real signal delivered to the test process.
pub struct NoOpSignalHandler;

impl NoOpSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignals for NoOpSignalHandler {
    fn wait_for_signal(&self) -> std::io::Result<ShutdownSignal> {
        loop {
            std::thread::park();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_handler_constructs() {
        let _handler = UnixSignalHandler::new();
        let _handler = UnixSignalHandler::default();
    }
}
