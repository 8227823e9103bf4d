//! Error type for flower generation
//!
//! Geometry never fails: degenerate inputs are clamped and logged. Errors are
//! reserved for the API boundary (seed validation) and for config I/O.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FloraError {
    #[error("Invalid seed {0}: seeds must be finite, non-negative integers")]
    InvalidSeed(f64),

    #[error("Invalid seed {0:?}: expected a non-negative integer")]
    InvalidSeedText(String),

    #[error("Failed to parse flower config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize flower config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}
