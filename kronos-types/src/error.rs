use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process-wide resources a prediction depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// A loaded predictor.
    Model,
    /// A normalized current dataset.
    Data,
}

impl Resource {
    /// Stable lowercase label used in error messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Data => "data",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse error classification surfaced to boundary layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input table does not fit the canonical schema.
    Schema,
    /// A predictor could not be constructed.
    Load,
    /// Data or model has not been loaded yet.
    NotReady,
    /// The predictor failed or exceeded its deadline.
    Prediction,
    /// Caller supplied an invalid argument.
    InvalidArgument,
    /// Reading an input file failed.
    Io,
}

impl ErrorKind {
    /// Stable, snake-case identifier for logs and API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Load => "load",
            Self::NotReady => "not_ready",
            Self::Prediction => "prediction",
            Self::InvalidArgument => "invalid_argument",
            Self::Io => "io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the kronos workspace.
///
/// Every variant maps onto one stable [`ErrorKind`] via [`KronosError::kind`],
/// so boundary layers can translate failures without matching on messages.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum KronosError {
    /// One or more required columns are absent from the input table.
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),

    /// A column could not be interpreted (e.g. unparsable timestamps).
    #[error("schema error: {0}")]
    Schema(String),

    /// The requested model key is not part of the catalog.
    #[error("unknown model: {key}")]
    UnknownModel {
        /// Key as supplied by the caller.
        key: String,
    },

    /// Constructing the predictor failed.
    #[error("failed to load model: {0}")]
    Load(String),

    /// A prediction was requested before its inputs were loaded.
    #[error("{resource} not loaded")]
    NotReady {
        /// Which input is missing.
        resource: Resource,
    },

    /// The predictor failed while generating a forecast.
    #[error("prediction failed: {0}")]
    Prediction(String),

    /// The predictor exceeded the configured deadline.
    #[error("prediction timed out after {timeout_ms}ms via {model}")]
    PredictionTimeout {
        /// Predictor name that timed out.
        model: String,
        /// Deadline that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Reading an input file failed.
    #[error("io error: {0}")]
    Io(String),
}

impl KronosError {
    /// Helper: build a `NotReady` error for the given resource.
    #[must_use]
    pub const fn not_ready(resource: Resource) -> Self {
        Self::NotReady { resource }
    }

    /// Helper: build an `UnknownModel` error.
    pub fn unknown_model(key: impl Into<String>) -> Self {
        Self::UnknownModel { key: key.into() }
    }

    /// Helper: build a `PredictionTimeout` error.
    pub fn prediction_timeout(model: impl Into<String>, timeout_ms: u64) -> Self {
        Self::PredictionTimeout {
            model: model.into(),
            timeout_ms,
        }
    }

    /// Stable classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingColumns(_) | Self::Schema(_) => ErrorKind::Schema,
            Self::UnknownModel { .. } | Self::Load(_) => ErrorKind::Load,
            Self::NotReady { .. } => ErrorKind::NotReady,
            Self::Prediction(_) | Self::PredictionTimeout { .. } => ErrorKind::Prediction,
            Self::InvalidArg(_) => ErrorKind::InvalidArgument,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    /// Returns true if the caller can recover by loading the missing input and retrying.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

impl From<std::io::Error> for KronosError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
