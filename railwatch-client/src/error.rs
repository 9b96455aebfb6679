//! Error types for railwatch-client
//!
//! Every failure here ends the current operation only; the upload session stays
//! usable for the next select/submit cycle.

use thiserror::Error;

/// Shown when a failure carries no usable detail
pub const GENERIC_FAILURE_MESSAGE: &str = "Error processing video.";

/// Shown when the user cancels an in-flight upload
pub const CANCELLED_MESSAGE: &str = "Upload cancelled.";

/// Errors returned by `UploadSession::submit`
#[derive(Debug, Error)]
pub enum SessionError {
    /// Submit with no file selected. Recovered locally, no state change.
    #[error("Please select a video first.")]
    NoFileSelected,

    /// Submit while a transfer is already in flight. No state change.
    #[error("An upload is already in progress")]
    UploadInProgress,

    /// Transfer failed; session is now `Failed`
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Success response with a malformed body; session is now `Failed`
    #[error(transparent)]
    Decoding(#[from] DecodingError),
}

impl SessionError {
    /// True for the local validation outcomes that leave the session untouched
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::NoFileSelected | SessionError::UploadInProgress)
    }
}

/// Transfer failures reported by a `DetectionTransport`
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection-level failure (refused, reset, DNS, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout
    #[error("Upload timed out")]
    TimedOut,

    /// Upload cancelled through the session's cancellation token
    #[error("Upload cancelled")]
    Cancelled,

    /// Reading the video file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Service answered with a non-success status
    #[error("Service returned HTTP {status}")]
    Status {
        status: u16,
        details: Option<String>,
        message: Option<String>,
    },
}

impl TransportError {
    /// Structured `details` field from the error body, if any
    pub fn details(&self) -> Option<&str> {
        match self {
            TransportError::Status { details, .. } => non_empty(details.as_deref()),
            _ => None,
        }
    }

    /// Generic `message` field from the error body, if any
    pub fn message(&self) -> Option<&str> {
        match self {
            TransportError::Status { message, .. } => non_empty(message.as_deref()),
            _ => None,
        }
    }

    /// User-facing message: `details`, then `message`, then the generic string
    pub fn failure_message(&self) -> String {
        if let TransportError::Cancelled = self {
            return CANCELLED_MESSAGE.to_string();
        }
        if let Some(details) = self.details() {
            return format!("Error: {}", details);
        }
        if let Some(message) = self.message() {
            return format!("Error: {}", message);
        }
        GENERIC_FAILURE_MESSAGE.to_string()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A success body that does not match the detection response shape
#[derive(Debug, Error)]
#[error("malformed detection response ({0})")]
pub struct DecodingError(String);

impl DecodingError {
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }

    pub fn failure_message(&self) -> String {
        format!("Error: {}", self)
    }
}

impl From<serde_json::Error> for DecodingError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

/// Failure of the independent metrics fetch. Only ever logged.
#[derive(Debug, Error)]
pub enum MetricsFetchError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Service returned HTTP {0}")]
    Status(u16),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(details: Option<&str>, message: Option<&str>) -> TransportError {
        TransportError::Status {
            status: 413,
            details: details.map(str::to_string),
            message: message.map(str::to_string),
        }
    }

    #[test]
    fn test_details_preferred() {
        let err = status_error(Some("file too large"), Some("upload rejected"));
        assert_eq!(err.failure_message(), "Error: file too large");
    }

    #[test]
    fn test_message_fallback() {
        let err = status_error(None, Some("upload rejected"));
        assert_eq!(err.failure_message(), "Error: upload rejected");
    }

    #[test]
    fn test_blank_details_skipped() {
        let err = status_error(Some("  "), Some("upload rejected"));
        assert_eq!(err.failure_message(), "Error: upload rejected");
    }

    #[test]
    fn test_generic_fallback() {
        assert_eq!(status_error(None, None).failure_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            TransportError::Network("connection refused".into()).failure_message(),
            GENERIC_FAILURE_MESSAGE
        );
        assert_eq!(TransportError::TimedOut.failure_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(TransportError::Cancelled.failure_message(), CANCELLED_MESSAGE);
    }

    #[test]
    fn test_decoding_message() {
        let err = DecodingError::new("missing field `video_path`");
        assert_eq!(
            err.failure_message(),
            "Error: malformed detection response (missing field `video_path`)"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(SessionError::NoFileSelected.is_validation());
        assert!(SessionError::UploadInProgress.is_validation());
        assert!(!SessionError::Transport(TransportError::TimedOut).is_validation());
    }
}
