//! Time-series utilities shared by the normalizer, orchestrator and assembler.
//!
//! - `infer`: estimate a representative step and extrapolate timestamps
//! - `timeframe`: human-readable sampling interval labels
//! - `window`: lookback/horizon slicing with strict ground-truth gating
/// Step estimation and timestamp extrapolation.
pub mod infer;
/// Sampling interval detection for display.
pub mod timeframe;
/// Lookback/horizon window slicing.
pub mod window;
