//! Store configuration, loaded the way the teacher's bootstrap config
//! layers a TOML file over `MSTOR_`-prefixed environment variables over
//! hardcoded defaults.

use std::path::PathBuf;

use mstor_domain::error::MstorError;
use serde::Deserialize;

/// Replica counts are clamped to this range regardless of what the
/// config file or environment say, mirroring `get_valid_repl`'s ceiling.
pub const MAX_REPLICAS: u32 = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct MstorConfig {
    /// Left empty when no `MSTOR_PATH` env var or config-file entry is
    /// set; `mstor_bootstrap` always overwrites this with its `--path`
    /// argument afterwards, since the CLI flag is mandatory.
    #[serde(default)]
    pub mstor_path: PathBuf,
    #[serde(default)]
    pub mstor_create: bool,
    #[serde(default = "default_cache_size")]
    pub mstor_cache_size: usize,
    #[serde(default = "default_sequester_time")]
    pub min_sequester_time: u64,
    #[serde(default = "default_min_repl")]
    pub min_repl: u32,
    #[serde(default = "default_man_repl")]
    pub man_repl: u32,
}

fn default_cache_size() -> usize {
    64 * 1024 * 1024
}

fn default_sequester_time() -> u64 {
    300
}

fn default_min_repl() -> u32 {
    2
}

fn default_man_repl() -> u32 {
    3
}

impl MstorConfig {
    pub fn load(config_file: Option<&std::path::Path>) -> Result<Self, MstorError> {
        let mut builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MSTOR")
                .try_parsing(true)
                .separator("_"),
        );
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path));
        }
        let raw = builder
            .build()
            .map_err(|e| MstorError::malformed(e.to_string()))?;
        let mut cfg: MstorConfig = raw
            .try_deserialize()
            .map_err(|e| MstorError::malformed(e.to_string()))?;
        cfg.clamp_replicas();
        Ok(cfg)
    }

    fn clamp_replicas(&mut self) {
        self.min_repl = clamp_repl(self.min_repl);
        self.man_repl = clamp_repl(self.man_repl);
    }
}

fn clamp_repl(v: u32) -> u32 {
    if v < 1 {
        1
    } else if v > MAX_REPLICAS {
        MAX_REPLICAS
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rejects_zero_and_oversize() {
        assert_eq!(clamp_repl(0), 1);
        assert_eq!(clamp_repl(1000), MAX_REPLICAS);
        assert_eq!(clamp_repl(3), 3);
    }
}
