//! Error types for account API calls.
//!
//! Every public call wraps its failure in [`Error`], which carries the
//! name of the operation that failed next to the underlying [`ErrorKind`].

/// What went wrong during an account API call.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid API token")]
    InvalidToken,

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// An account API error labelled with the operation that produced it.
#[derive(Debug, thiserror::Error)]
#[error("{op}: {kind}")]
pub struct Error {
    /// Name of the failing call, e.g. `create_extension_binary`.
    pub op: &'static str,
    #[source]
    pub kind: ErrorKind,
}

impl Error {
    pub fn new(op: &'static str, kind: impl Into<ErrorKind>) -> Self {
        Self {
            op,
            kind: kind.into(),
        }
    }

    /// Returns the HTTP status if the backend rejected the request.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ErrorKind::Api { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Attaches an operation label to a failed result.
pub(crate) trait OpContext<T> {
    fn op(self, op: &'static str) -> Result<T, Error>;
}

impl<T, E: Into<ErrorKind>> OpContext<T> for Result<T, E> {
    fn op(self, op: &'static str) -> Result<T, Error> {
        self.map_err(|e| Error::new(op, e))
    }
}
