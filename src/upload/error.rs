use std::path::PathBuf;

use thiserror::Error;

use crate::flickr::FlickrError;
use crate::manifest::ManifestError;

/// Why a row did not produce an uploaded photo.
///
/// Every variant is caught at the row boundary and turned into an
/// [`super::UploadOutcome`]; none of them stop the run.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("{0}")]
    ManifestRowMalformed(#[from] ManifestError),

    #[error("File does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Remote(#[from] FlickrError),

    /// The upload call went through but its response could not be used.
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),
}
