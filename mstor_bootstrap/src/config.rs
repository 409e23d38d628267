//! Bootstrap-phase configuration: the immutable settings `main` derives
//! from `Cli` before any infrastructure is constructed. Mirrors the
//! `AppConfig`/builder split the rest of the pack uses to separate
//! "what the user asked for" from "what the application layer consumes".

use std::path::PathBuf;

use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct AppConfig {
    db_path: PathBuf,
    create: bool,
    cache_size: Option<usize>,
    config_file: Option<PathBuf>,
    dump_and_exit: bool,
    log_level: String,
}

impl AppConfig {
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn create(&self) -> bool {
        self.create
    }

    pub fn cache_size(&self) -> Option<usize> {
        self.cache_size
    }

    pub fn config_file(&self) -> Option<&PathBuf> {
        self.config_file.as_ref()
    }

    pub fn dump_and_exit(&self) -> bool {
        self.dump_and_exit
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

impl From<&Cli> for AppConfig {
    fn from(cli: &Cli) -> Self {
        AppConfig::builder()
            .db_path(cli.path.clone())
            .create(cli.create)
            .cache_size(cli.cache_size)
            .config_file(cli.config.clone())
            .dump_and_exit(cli.dump)
            .log_level(cli.log_level.clone())
            .build()
    }
}

#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    db_path: Option<PathBuf>,
    create: bool,
    cache_size: Option<usize>,
    config_file: Option<PathBuf>,
    dump_and_exit: bool,
    log_level: Option<String>,
}

impl AppConfigBuilder {
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.db_path = Some(path.into());
        self
    }

    pub fn create(mut self, enabled: bool) -> Self {
        self.create = enabled;
        self
    }

    pub fn cache_size(mut self, size: Option<usize>) -> Self {
        self.cache_size = size;
        self
    }

    pub fn config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    pub fn dump_and_exit(mut self, enabled: bool) -> Self {
        self.dump_and_exit = enabled;
        self
    }

    pub fn log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// # Panics
    ///
    /// Panics if `db_path` was never set.
    pub fn build(self) -> AppConfig {
        AppConfig {
            db_path: self.db_path.expect("db_path is required"),
            create: self.create,
            cache_size: self.cache_size,
            config_file: self.config_file,
            dump_and_exit: self.dump_and_exit,
            log_level: self.log_level.unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let config = AppConfig::builder().db_path("/tmp/mstor-test").build();
        assert_eq!(config.db_path(), &PathBuf::from("/tmp/mstor-test"));
        assert!(!config.create());
        assert_eq!(config.cache_size(), None);
        assert_eq!(config.log_level(), "info");
        assert!(!config.dump_and_exit());
    }

    #[test]
    fn from_cli_carries_every_field() {
        let cli = Cli {
            path: PathBuf::from("/var/lib/mstor"),
            create: true,
            cache_size: Some(1 << 20),
            config: Some(PathBuf::from("/etc/mstor.toml")),
            dump: true,
            log_level: "debug".to_string(),
        };
        let config = AppConfig::from(&cli);
        assert_eq!(config.db_path(), &cli.path);
        assert!(config.create());
        assert_eq!(config.cache_size(), Some(1 << 20));
        assert_eq!(config.config_file(), Some(&PathBuf::from("/etc/mstor.toml")));
        assert!(config.dump_and_exit());
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    #[should_panic(expected = "db_path is required")]
    fn build_panics_without_db_path() {
        AppConfig::builder().build();
    }
}
