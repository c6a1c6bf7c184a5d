use std::path::PathBuf;

use thiserror::Error;

/// Why a single metric or sale lookup produced no value.
///
/// These never abort a run; the payload builder swaps in the previous value.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Steam API error ({0})")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Json(#[from] json::Error),
    #[error("response missing {0}")]
    MissingField(&'static str),
    #[error("storefront reported no data for appid {0}")]
    Unsuccessful(u32),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: invalid JSON: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(String),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("cannot build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}
