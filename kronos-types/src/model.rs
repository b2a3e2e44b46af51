//! Model catalog and execution device identifiers.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KronosError;

/// Identifier of a model in the built-in catalog.
///
/// These map one-to-one with the pretrained checkpoints the predictor loader
/// knows how to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelKey {
    /// Lightweight model for fast predictions.
    KronosMini,
    /// Balanced performance and speed.
    KronosSmall,
    /// High quality predictions.
    KronosBase,
}

impl ModelKey {
    /// Every catalog entry, smallest first.
    pub const ALL: [Self; 3] = [Self::KronosMini, Self::KronosSmall, Self::KronosBase];

    /// Stable, kebab-case identifier used by callers to select a model.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KronosMini => "kronos-mini",
            Self::KronosSmall => "kronos-small",
            Self::KronosBase => "kronos-base",
        }
    }

    /// Static description of the checkpoint behind this key.
    #[must_use]
    pub const fn spec(self) -> ModelSpec {
        match self {
            Self::KronosMini => ModelSpec {
                key: self,
                name: "Kronos-mini",
                model_id: "NeoQuasar/Kronos-mini",
                tokenizer_id: "NeoQuasar/Kronos-Tokenizer-2k",
                context_length: 2048,
                params: "4.1M",
                description: "Lightweight model for fast predictions",
            },
            Self::KronosSmall => ModelSpec {
                key: self,
                name: "Kronos-small",
                model_id: "NeoQuasar/Kronos-small",
                tokenizer_id: "NeoQuasar/Kronos-Tokenizer-base",
                context_length: 512,
                params: "24.7M",
                description: "Balanced performance and speed",
            },
            Self::KronosBase => ModelSpec {
                key: self,
                name: "Kronos-base",
                model_id: "NeoQuasar/Kronos-base",
                tokenizer_id: "NeoQuasar/Kronos-Tokenizer-base",
                context_length: 512,
                params: "102.3M",
                description: "High quality predictions",
            },
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKey {
    type Err = KronosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| KronosError::unknown_model(s))
    }
}

/// Catalog entry describing a pretrained checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelSpec {
    /// Catalog key.
    pub key: ModelKey,
    /// Human-readable model name.
    pub name: &'static str,
    /// Hub identifier of the model weights.
    pub model_id: &'static str,
    /// Hub identifier of the matching tokenizer.
    pub tokenizer_id: &'static str,
    /// Maximum number of input rows the model attends to.
    pub context_length: usize,
    /// Parameter count label.
    pub params: &'static str,
    /// Short description for model pickers.
    pub description: &'static str,
}

/// Compute device a predictor is constructed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    /// Host CPU.
    #[default]
    Cpu,
    /// CUDA GPU, optionally pinned to an ordinal.
    Cuda(Option<u32>),
    /// Apple Metal Performance Shaders.
    Mps,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(None) => f.write_str("cuda"),
            Self::Cuda(Some(n)) => write!(f, "cuda:{n}"),
            Self::Mps => f.write_str("mps"),
        }
    }
}

impl FromStr for Device {
    type Err = KronosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cpu" => Ok(Self::Cpu),
            "cuda" => Ok(Self::Cuda(None)),
            "mps" => Ok(Self::Mps),
            other => other
                .strip_prefix("cuda:")
                .and_then(|n| n.parse::<u32>().ok())
                .map(|n| Self::Cuda(Some(n)))
                .ok_or_else(|| KronosError::Load(format!("unsupported device: {other}"))),
        }
    }
}

impl Serialize for Device {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Device {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
