use std::path::PathBuf;

use thiserror::Error;

/// Errors reading the OAuth token set from disk.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to read credentials file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(
        "Credentials file {} has {found} entries; expected API key, API secret, \
         OAuth token and OAuth token secret on separate lines",
        .path.display()
    )]
    Incomplete { path: PathBuf, found: usize },
}
