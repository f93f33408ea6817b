use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlickrError {
    /// `stat="fail"` in a REST or upload response.
    #[error("Flickr API error {code}: {message}")]
    Api { code: String, message: String },

    #[error("HTTP error {status} from {method}")]
    HttpStatus { status: u16, method: String },

    #[error("Malformed response from {method}: {reason}")]
    MalformedResponse { method: String, reason: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
