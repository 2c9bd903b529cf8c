use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while loading, reshaping, or selecting from indicator tables.
///
/// `source` fields carry the input name (usually the file path) so a failure always
/// points at the export that caused it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{source_name} is not valid CSV: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },

    #[error("{source_name}: required column `{column}` not found")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("{source_name}, line {line}, column `{column}`: `{value}` is not a number")]
    InvalidNumber {
        source_name: String,
        line: u64,
        column: String,
        value: String,
    },

    #[error("unknown country `{0}`")]
    UnknownCountry(String),

    #[error("{source_name}: no period column `{period}`")]
    UnknownPeriod { source_name: String, period: String },

    #[error("nothing selected: {0}")]
    EmptySelection(&'static str),

    #[error("no dataset configured for `{0}`")]
    MissingDataset(String),

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
