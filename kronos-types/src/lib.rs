//! Kronos-specific data transfer objects and configuration primitives.
#![warn(missing_docs)]

mod config;
mod error;
mod model;
mod request;

pub use config::{KronosConfig, PredictionDefaults};
pub use error::{ErrorKind, KronosError, Resource};
pub use model::{Device, ModelKey, ModelSpec};
pub use request::{PredictionRequest, PredictionRequestBuilder};
