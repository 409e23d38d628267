//! Composition root: parse arguments, assemble configuration, open the
//! store, optionally dump it, then block until a shutdown signal arrives.
//! There is no network listener here — wiring RPC framing and cluster
//! membership is explicitly out of scope for this crate.

use std::io;
use std::sync::Arc;

use mstor::infrastructure::adapters::StaticUserDirectory;
use mstor::infrastructure::config::MstorConfig;
use mstor::infrastructure::logging::observability::init_tracing;
use mstor::infrastructure::repositories::RocksEngine;
use mstor::application::services::dumper;
use mstor::Mstor;
use mstor_domain::error::MstorError;
use mstor_domain::repositories::UserRecord;
use thiserror::Error;

use mstor_bootstrap::cli::{Cli, CliError};
use mstor_bootstrap::config::AppConfig;
use mstor_bootstrap::exit_code::ExitCode;
use mstor_bootstrap::platform::create_platform;
use mstor_bootstrap::signals::{SystemSignals, UnixSignalHandler};

#[derive(Debug, Error)]
enum BootstrapError {
    #[error(transparent)]
    Cli(#[from] CliError),
    #[error(transparent)]
    Store(#[from] MstorError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl BootstrapError {
    fn exit_code(&self) -> ExitCode {
        match self {
            BootstrapError::Cli(_) => ExitCode::UsageError,
            BootstrapError::Store(err) => ExitCode::from_mstor_error(err),
            BootstrapError::Io(_) => ExitCode::IoError,
        }
    }
}

fn main() {
    let cli = Cli::parse_args();
    match run(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            tracing::error!(error = %err, "mstor exiting with error");
            std::process::exit(err.exit_code().as_i32());
        }
    }
}

/// `Root` is the only identity seeded into the user directory: there is no
/// transport here to authenticate any other caller, and the production
/// directory service is an external collaborator (non-goal of this crate).
fn seed_user_directory() -> StaticUserDirectory {
    StaticUserDirectory::new().with_user(
        "root",
        UserRecord {
            uid: 0,
            gid: 0,
            groups: Vec::new(),
        },
    )
}

fn run(cli: Cli) -> Result<ExitCode, BootstrapError> {
    cli.validate()?;
    let app_config = AppConfig::from(&cli);
    init_tracing(app_config.log_level());

    let platform = create_platform();
    tracing::info!(
        platform = platform.platform_name(),
        cpus = platform.cpu_count(),
        elevated = platform.is_elevated(),
        "starting mstor"
    );

    let mut store_config = MstorConfig::load(app_config.config_file().map(|p| p.as_path()))
        .map_err(BootstrapError::Store)?;
    store_config.mstor_path = app_config.db_path().clone();
    store_config.mstor_create = app_config.create();
    if let Some(cache_size) = app_config.cache_size() {
        store_config.mstor_cache_size = cache_size;
    }

    let engine = RocksEngine::open(&store_config.mstor_path, store_config.mstor_cache_size)
        .map_err(BootstrapError::Store)?;
    let user_dir = seed_user_directory();
    let mstor = Mstor::open(Arc::new(engine), Arc::new(user_dir), store_config)
        .map_err(BootstrapError::Store)?;

    tracing::info!(path = %app_config.db_path().display(), "mstor ready");

    if app_config.dump_and_exit() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        dumper::dump(&mstor, &mut handle).map_err(BootstrapError::Store)?;
        return Ok(ExitCode::Success);
    }

    let signal_handler = UnixSignalHandler::new();
    let received = signal_handler.wait_for_signal().map_err(BootstrapError::Io)?;
    tracing::info!(signal = ?received, "shutting down");

    // `mstor`, its `RocksEngine`, and the engine's `DB`/`Cache`/`Options`
    // drop here in reverse construction order as this scope ends.
    Ok(ExitCode::Success)
}
