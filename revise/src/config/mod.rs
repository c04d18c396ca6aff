//! Configuration for the `revise` binary.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/revise/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use revise_proto::identity::UserId;

use crate::cli::Command;
use crate::storage::{FileStore, InMemoryStore, Persistence, StoreError};
use crate::validation::Limits;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A setting has a value outside its allowed set.
    #[error("invalid value for {setting}: {value:?}")]
    InvalidValue {
        setting: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    session: SessionFileConfig,
    limits: LimitsFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    backend: Option<String>,
    data_dir: Option<PathBuf>,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    user: Option<String>,
}

/// `[limits]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LimitsFileConfig {
    max_task_title_len: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Where collections are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// One JSON file per collection under the data directory.
    #[default]
    File,
    /// Nothing survives the process; useful for trying things out.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            _ => Err(ConfigError::InvalidValue {
                setting: "storage.backend",
                value: s.to_string(),
            }),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct ReviseConfig {
    // -- Storage --
    pub backend: StorageBackend,
    /// Directory for the file backend.
    pub data_dir: PathBuf,

    // -- Session --
    /// Identity to sign in as. `None` means signed out.
    pub user: Option<UserId>,

    // -- Limits --
    pub limits: Limits,
}

impl Default for ReviseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: default_data_dir(),
            user: None,
            limits: Limits::default(),
        }
    }
}

impl ReviseConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path (`~/.config/revise/config.toml`)
    /// is tried and silently ignored if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if the storage backend name is unknown.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, &file)
    }

    /// Resolve a `ReviseConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` so it can be
    /// tested without CLI parsing.
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match cli.backend.as_deref().or(file.storage.backend.as_deref()) {
            Some(name) => name.parse()?,
            None => defaults.backend,
        };

        let user = cli
            .user
            .clone()
            .or_else(|| file.session.user.clone())
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .map(UserId::new);

        Ok(Self {
            backend,
            data_dir: cli
                .data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone())
                .unwrap_or(defaults.data_dir),
            user,
            limits: Limits {
                max_task_title_len: file
                    .limits
                    .max_task_title_len
                    .unwrap_or(defaults.limits.max_task_title_len),
            },
        })
    }

    /// Opens the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the data directory cannot be created.
    pub fn open_persistence(&self) -> Result<Persistence, StoreError> {
        let persistence = match self.backend {
            StorageBackend::File => Persistence::new(Arc::new(FileStore::open(&self.data_dir)?)),
            StorageBackend::Memory => Persistence::new(Arc::new(InMemoryStore::new())),
        };
        tracing::info!(backend = ?self.backend, data_dir = %self.data_dir.display(), "storage opened");
        Ok(persistence)
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Task and project boards kept in local storage")]
pub struct CliArgs {
    /// Identity to act as.
    #[arg(short, long, global = true, env = "REVISE_USER")]
    pub user: Option<String>,

    /// Path to config file (default: `~/.config/revise/config.toml`).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage backend: `file` or `memory`.
    #[arg(long, global = true, env = "REVISE_BACKEND")]
    pub backend: Option<String>,

    /// Directory for the file backend.
    #[arg(long, global = true, env = "REVISE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info", env = "REVISE_LOG")]
    pub log_level: String,

    /// Write logs to this file instead of stderr.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// `<data dir>/revise`, or `./.revise` if the platform has no data dir.
fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(".revise"), |dir| dir.join("revise"))
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("revise").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
