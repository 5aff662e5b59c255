//! Error types for trust operations.

use std::io;

use thiserror::Error;

/// Failure of the elevated execution itself.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("authentication was cancelled")]
    Declined,

    #[error("{program} exited with status {}: {}", exit_code(.code), .stderr.trim())]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

/// Outcome of a failed `add-trusted-cert` call. Causes are passed through unmodified.
#[derive(Debug, Error)]
pub enum TrustError {
    #[error(transparent)]
    Elevation(#[from] ElevationError),

    /// Text the trust tool wrote to its error stream.
    #[error("{0}")]
    Tool(String),
}

/// Failure to read the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
