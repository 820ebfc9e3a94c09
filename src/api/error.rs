/// Errors raised at the control-server API seam.
///
/// Everything above the API client works with `anyhow`; this enum exists so
/// callers can pull the server's own error message out of a failed request
/// (the dashboard shows it verbatim in writer alerts).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// The request never produced a response (connection refused, timeout, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but did not match the expected record.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The message a user should see for this failure.
    pub fn server_message(&self) -> &str {
        match self {
            Self::Status { message, .. } => message,
            Self::Transport(msg) | Self::Decode(msg) => msg,
        }
    }
}

/// Extract a human-readable message from an error response body.
///
/// odin-control puts it under `error`; adapter errors use `response`. Falls
/// back to the trimmed body itself.
pub fn error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "response"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) => return s.clone(),
                Some(other) if !other.is_null() => return other.to_string(),
                _ => {}
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error message".to_string()
    } else {
        trimmed.to_string()
    }
}
