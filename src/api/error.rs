use serde::Deserialize;
use thiserror::Error;

/// Message used when the server gives no usable `detail`.
pub const FALLBACK_MESSAGE: &str = "Request failed";

/// Failure of a single API call.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{detail}")]
    Status { status: u16, detail: String },

    /// The request never got a response (connection refused, DNS, ...).
    #[error("cannot reach the backend: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response carried a body we could not decode.
    #[error("unexpected response from the backend: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

impl ClientError {
    /// Builds a status error from a raw response body, pulling `detail` out
    /// of `{"detail": "..."}` when present.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self::Status { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
