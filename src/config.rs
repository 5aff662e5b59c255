//! Configuration loading and path resolution.
//!
//! Supports ADD_TRUSTED_CERT_HOME env var override for testing.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::platform::Elevation;
use crate::request::TrustRequest;

pub const DEFAULT_TOOL: &str = "security";
pub const DEFAULT_PROMPT: &str = "Keychain access for adding new certificate";

/// Where the config file lives.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_dir: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn from_base(base: PathBuf) -> Self {
        let config_file = base.join("config.toml");
        Self {
            config_dir: base,
            config_file,
        }
    }

    /// Paths for testing: use a temp dir as base.
    pub fn for_test(base: impl AsRef<Path>) -> Self {
        Self::from_base(base.as_ref().to_path_buf())
    }

    /// Default paths (respects ADD_TRUSTED_CERT_HOME).
    pub fn default_paths() -> Self {
        let base = if let Ok(home) = std::env::var("ADD_TRUSTED_CERT_HOME") {
            PathBuf::from(home)
        } else if let Some(dirs) =
            directories::ProjectDirs::from("com", "add-trusted-cert", "add-trusted-cert")
        {
            dirs.config_dir().to_path_buf()
        } else {
            PathBuf::from(".add-trusted-cert")
        };
        Self::from_base(base)
    }
}

/// How the trust tool is launched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunnerConfig {
    pub tool: String,
    pub prompt: String,
    pub elevation: Elevation,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            elevation: Elevation::default(),
        }
    }
}

/// config.toml structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub runner: RunnerConfig,
    /// Default request options; command-line flags take precedence.
    #[serde(default)]
    pub request: TrustRequest,
}

impl Config {
    /// Load config from `path` (with shared lock). A missing file gives defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.is_file() {
            return Ok(Config::default());
        }
        let io_err = |source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        };
        let mut file = fs::OpenOptions::new().read(true).open(path).map_err(io_err)?;
        fs2::FileExt::lock_shared(&file).map_err(io_err)?;
        let mut s = String::new();
        file.read_to_string(&mut s).map_err(io_err)?;
        toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}
