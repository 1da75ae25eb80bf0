use std::path::PathBuf;

use thiserror::Error;

use crate::source::error::SourceError;
use crate::source::types::Channel;
use crate::version::Version;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Output directory {0} already exists")]
    OutputAlreadyExists(PathBuf),

    #[error("Invalid release list: {0}")]
    Releases(#[source] SourceError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("Add-on {id} {version} ({channel}) is defined twice: {first} and {second}")]
    DuplicateVersion {
        id: String,
        version: Version,
        channel: Channel,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to handle JSON for {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
