use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use miniapp_engine::DEFAULT_API_BASE;
use serde::Deserialize;
use thiserror::Error;

use super::logging::LogDestination;

const DEFAULT_CONFIG_FILE: &str = "miniapp.ron";

pub const ENV_API_BASE: &str = "MINIAPP_API_BASE";
pub const ENV_STORAGE_DIR: &str = "MINIAPP_STORAGE_DIR";
pub const ENV_LAUNCH_FILE: &str = "MINIAPP_LAUNCH_FILE";

#[derive(Parser, Debug, Default)]
#[command(name = "miniapp", about = "Terminal client for the mini app API")]
pub struct Args {
    /// RON configuration file (defaults to ./miniapp.ron when present).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Base address of the API server.
    #[arg(long)]
    pub api_base: Option<String>,
    /// Directory holding local storage.
    #[arg(long)]
    pub storage_dir: Option<PathBuf>,
    /// JSON file with the host's launch object (`initData`, `initDataUnsafe`).
    #[arg(long)]
    pub launch_file: Option<PathBuf>,
    #[arg(long, value_enum)]
    pub log: Option<LogDestination>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base: String,
    pub storage_dir: PathBuf,
    pub log_destination: LogDestination,
    pub launch_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            storage_dir: PathBuf::from("."),
            log_destination: LogDestination::default(),
            launch_file: None,
        }
    }
}

/// Every field optional: the file only overrides what it names.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_base: Option<String>,
    storage_dir: Option<PathBuf>,
    log_destination: Option<LogDestination>,
    launch_file: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults, then the config file, then the environment, then CLI flags.
    pub fn load(args: &Args, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let file = match &args.config {
            Some(path) => Some(read_file_config(path)?),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Some(read_file_config(Path::new(DEFAULT_CONFIG_FILE))?)
            }
            None => None,
        };
        if let Some(file) = file {
            config.apply_file(file);
        }

        if let Some(v) = env(ENV_API_BASE).filter(|v| !v.is_empty()) {
            config.api_base = v;
        }
        if let Some(v) = env(ENV_STORAGE_DIR).filter(|v| !v.is_empty()) {
            config.storage_dir = PathBuf::from(v);
        }
        if let Some(v) = env(ENV_LAUNCH_FILE).filter(|v| !v.is_empty()) {
            config.launch_file = Some(PathBuf::from(v));
        }

        if let Some(v) = &args.api_base {
            config.api_base = v.clone();
        }
        if let Some(v) = &args.storage_dir {
            config.storage_dir = v.clone();
        }
        if let Some(v) = &args.launch_file {
            config.launch_file = Some(v.clone());
        }
        if let Some(v) = args.log {
            config.log_destination = v;
        }

        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(v) = file.api_base {
            self.api_base = v;
        }
        if let Some(v) = file.storage_dir {
            self.storage_dir = v;
        }
        if let Some(v) = file.log_destination {
            self.log_destination = v;
        }
        if file.launch_file.is_some() {
            self.launch_file = file.launch_file;
        }
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    ron::from_str(&raw).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
