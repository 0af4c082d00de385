use std::{io, path::PathBuf};

use thiserror::Error;

/// Fatal startup failures while reading mesh or texture resources.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Resource not found: {}", path.display())]
    ResourceNotFound { path: PathBuf },

    #[error("Malformed resource: {0}")]
    MalformedResource(String),

    #[error("I/O error while reading resource")]
    Io(#[from] io::Error),

    #[error("Failed to decode image {}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl AssetError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResource(msg.into())
    }

    /// Map an open/read failure on `path`, singling out missing files.
    pub(crate) fn from_open(path: impl Into<PathBuf>, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::ResourceNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }
}

pub type AssetResult<T> = Result<T, AssetError>;
