use std::path::PathBuf;

use crate::WindowId;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("review store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("review store at {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("encoding review record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("no window {0:?}")]
    UnknownWindow(WindowId),
}

pub type Result<T, E = PlatformError> = std::result::Result<T, E>;
