//! CUA-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, CuaError>;

/// Top-level error type for CPU Usage Alert.
#[derive(Debug, Error)]
pub enum CuaError {
    #[error("[CUA-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[CUA-1002] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[CUA-2001] CPU sensor unavailable: {details}")]
    SensorUnavailable { details: String },

    #[error("[CUA-2002] monitoring session already stopped; construct a new session")]
    SessionExhausted,

    #[error("[CUA-3001] alert sink {sink} failed to accept event: {details}")]
    SinkNotification {
        sink: &'static str,
        details: String,
    },

    #[error("[CUA-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[CUA-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl CuaError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "CUA-1001",
            Self::ConfigParse { .. } => "CUA-1002",
            Self::SensorUnavailable { .. } => "CUA-2001",
            Self::SessionExhausted => "CUA-2002",
            Self::SinkNotification { .. } => "CUA-3001",
            Self::Io { .. } => "CUA-3002",
            Self::Runtime { .. } => "CUA-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// `SensorUnavailable` is deliberately non-retryable: a CPU sensor that
    /// stops answering points at an environment problem, not a transient one.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. } | Self::SinkNotification { .. } | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for CuaError {
    fn from(value: serde_json::Error) -> Self {
        Self::SinkNotification {
            sink: "json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for CuaError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}
