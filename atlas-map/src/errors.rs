use thiserror::Error;

/// Error type for map rendering failures.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a GeoJSON FeatureCollection, found '{0}'")]
    NotFeatureCollection(String),
    #[error("feature {index} has no '{property}' property")]
    MissingNameProperty { index: usize, property: String },
    #[error("cannot classify an empty value distribution")]
    EmptyDistribution,
    #[error("bin count must be at least 1, got {0}")]
    BadBinCount(usize),
}

/// Convenience type for `Result<T, MapError>`.
pub type MapResult<T> = Result<T, MapError>;
