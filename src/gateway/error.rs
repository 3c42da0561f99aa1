use thiserror::Error;

/// Errors from the external parse/similarity services.
///
/// Per-file in batches: one file's gateway error is isolated to that file's
/// slot in the batch result. Only the single-file parse path surfaces these
/// to the caller as a hard failure.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The service did not answer within the bounded wait.
    #[error("gateway call timed out")]
    Timeout,

    /// Transport-level failure (connect, TLS, DNS).
    #[error("gateway unreachable: {reason}")]
    Transport {
        /// Underlying client error message.
        reason: String,
    },

    /// Non-success HTTP status from the service.
    #[error("gateway returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The service answered but the body could not be decoded.
    #[error("invalid gateway response: {reason}")]
    InvalidResponse {
        /// Decode error message.
        reason: String,
    },

    /// The service rejected this particular file.
    #[error("gateway rejected file: {reason}")]
    Rejected {
        /// Service-supplied rejection reason.
        reason: String,
    },
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GatewayError::Timeout
        } else if let Some(status) = e.status() {
            GatewayError::Status {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            GatewayError::InvalidResponse {
                reason: e.to_string(),
            }
        } else {
            GatewayError::Transport {
                reason: e.to_string(),
            }
        }
    }
}
