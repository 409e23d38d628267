//! Command-line interface parsing, using `clap` the way the rest of the
//! pack does: a single derived struct, validated after parsing rather than
//! woven into the parser itself.

use std::path::{Path, PathBuf};

use clap::Parser;
use thiserror::Error;

/// Arguments accepted by the `mstor` process entry point.
#[derive(Parser, Debug, Clone)]
#[command(name = "mstor")]
#[command(about = concat!("mstor metadata server v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    /// Path to the on-disk database directory.
    #[arg(long)]
    pub path: PathBuf,

    /// Create the database if it does not already exist.
    #[arg(long)]
    pub create: bool,

    /// RocksDB block cache size, in bytes.
    #[arg(long)]
    pub cache_size: Option<usize>,

    /// TOML config file layered under `MSTOR_`-prefixed environment
    /// variables (see `mstor::infrastructure::config`).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Dump every record in the store to stdout after opening, then exit
    /// without waiting for a shutdown signal.
    #[arg(long)]
    pub dump: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("path does not exist: {0} (pass --create to initialize a new store)")]
    PathMissing(PathBuf),

    #[error("cache size must be positive")]
    ZeroCacheSize,

    #[error("config file does not exist: {0}")]
    ConfigMissing(PathBuf),
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Checks invariants `clap` itself can't express: `path` must already
    /// exist unless `--create` was given, `cache_size` must be nonzero,
    /// and an explicit `--config` must point at a real file.
    pub fn validate(&self) -> Result<(), CliError> {
        if !self.create && !path_exists(&self.path) {
            return Err(CliError::PathMissing(self.path.clone()));
        }
        if let Some(0) = self.cache_size {
            return Err(CliError::ZeroCacheSize);
        }
        if let Some(config_path) = &self.config {
            if !path_exists(config_path) {
                return Err(CliError::ConfigMissing(config_path.clone()));
            }
        }
        Ok(())
    }
}

fn path_exists(path: &Path) -> bool {
    path.exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_cli() -> Cli {
        Cli {
            path: PathBuf::from("/nonexistent/does/not/exist"),
            create: false,
            cache_size: None,
            config: None,
            dump: false,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn rejects_missing_path_without_create() {
        let cli = base_cli();
        assert!(matches!(cli.validate(), Err(CliError::PathMissing(_))));
    }

    #[test]
    fn accepts_missing_path_with_create() {
        let mut cli = base_cli();
        cli.create = true;
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn rejects_zero_cache_size() {
        let mut cli = base_cli();
        cli.create = true;
        cli.cache_size = Some(0);
        assert!(matches!(cli.validate(), Err(CliError::ZeroCacheSize)));
    }

    #[test]
    fn rejects_missing_config_file() {
        let mut cli = base_cli();
        cli.create = true;
        cli.config = Some(PathBuf::from("/nonexistent/mstor.toml"));
        assert!(matches!(cli.validate(), Err(CliError::ConfigMissing(_))));
    }
}
