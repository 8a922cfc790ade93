use thiserror::Error;

/// Error type for pipeline failures.
///
/// Everything here is fatal: the pipeline is a single batch run with no retry
/// path, so the first I/O or schema failure aborts the run. Join-coverage
/// gaps and arithmetic edge cases are deliberately *not* errors: dropped
/// rows are reported by the joiner and non-finite ratios propagate as plain
/// `f64` values.
#[derive(Error, Debug)]
pub enum AtlasError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV in {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },
    #[error("fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{table}: missing required column '{column}'")]
    MissingColumn { table: String, column: String },
    #[error("{table}: header '{header}' is not a 4-digit year")]
    BadYearHeader { table: String, header: String },
    #[error("{table}: row {row}: cannot parse '{value}' as a number")]
    BadNumericCell {
        table: String,
        row: usize,
        value: String,
    },
    #[error("unknown continent code '{0}' (expected one of AF, AS, EU, NA, OC, SA)")]
    UnknownContinent(String),
    #[error("reference config is not valid TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("reference config: {0}")]
    ConfigInvalid(String),
}

/// Convenience type for `Result<T, AtlasError>`.
pub type AtlasResult<T> = Result<T, AtlasError>;
