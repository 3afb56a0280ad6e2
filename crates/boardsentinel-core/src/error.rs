//! Error type shared across BoardSentinel components.
//!
//! Only two variants ever reach a caller of the diagnostic reporter:
//! [`Error::EmptyHistory`] (caller misuse) and, at startup,
//! [`Error::InvalidConfig`]. Every remote failure is absorbed into the offline
//! report before it leaves the reporter.

/// Result type alias for BoardSentinel operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote request could not be completed (network, TLS, DNS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote endpoint answered with a non-success status.
    #[error("remote endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// No API credential is configured for the remote capability.
    #[error("missing credential: set {0} to enable AI diagnostics")]
    MissingCredential(&'static str),

    /// The response body was not valid JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// `analyze` was called without any readings.
    #[error("telemetry history is empty")]
    EmptyHistory,

    /// A configuration value was out of range or unparsable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for failures of the remote capability itself, as opposed to
    /// caller or configuration mistakes.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::Status { .. }
                | Self::MissingCredential(_)
                | Self::MalformedResponse(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_errors_are_classified() {
        assert!(Error::Transport("reset".into()).is_remote());
        assert!(
            Error::Status {
                status: 429,
                body: "quota".into()
            }
            .is_remote()
        );
        assert!(Error::MissingCredential("GEMINI_API_KEY").is_remote());
        assert!(!Error::EmptyHistory.is_remote());
        assert!(!Error::InvalidConfig("x".into()).is_remote());
    }

    #[test]
    fn malformed_response_from_serde() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::MalformedResponse(_)));
        assert!(err.to_string().starts_with("malformed response"));
    }

    #[test]
    fn missing_credential_names_variable() {
        let msg = Error::MissingCredential("GEMINI_API_KEY").to_string();
        assert!(msg.contains("GEMINI_API_KEY"));
    }
}
