//! Error types for configuration loading and map generation.

use thiserror::Error;

/// Failures while loading the generator configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Settings that cannot produce a complete map. A failed run produces no
/// partial output.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("map size must be a positive number of cells")]
    InvalidMapSize,

    #[error("layer {layer} masks against the first height map, but the reference layer is inactive")]
    MissingMaskReference { layer: usize },
}
