//! Structured logging setup, following the teacher's
//! `infrastructure::logging` placement: a single `init_tracing` call made
//! once from the bootstrap binary, an `EnvFilter` so operators can tune
//! verbosity per module without a rebuild.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(true).init();
}
