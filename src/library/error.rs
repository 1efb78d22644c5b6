use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed library document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no tracks found in {0}")]
    NoTracks(PathBuf),

    #[error("unsupported library source: {0}")]
    UnsupportedSource(PathBuf),
}
