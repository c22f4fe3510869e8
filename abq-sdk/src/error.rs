use std::time::Duration;

use abq_api::MissingLink;
use abq_api::types::NetworkType;

/// Errors returned by the Abiquo SDK.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The API call failed: transport, server status or payload error.
    #[error("API error: {0}")]
    Api(#[source] abq_api::Error),

    /// The entity lacks the relation needed for the operation. Raised before
    /// any request is sent.
    #[error(transparent)]
    MissingLink(#[from] MissingLink),

    /// Local validation failed before any request was sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// The wrapper was deleted and can no longer be used.
    #[error("{kind} has been deleted")]
    Deleted { kind: &'static str },

    /// The server reported an asynchronous task as failed.
    #[error("task {task_id} failed: {detail}")]
    TaskFailed { task_id: String, detail: String },

    /// The caller's time budget elapsed. The operation may still be running
    /// on the server.
    #[error("timed out after {timeout:?} waiting for {operation}")]
    Timeout { operation: String, timeout: Duration },

    /// A network was narrowed to the wrong variant.
    #[error("invalid network type: expected {expected}, found {actual}")]
    InvalidNetworkType {
        expected: NetworkType,
        actual: NetworkType,
    },

    #[error("unsupported: {0}")]
    Unsupported(String),

    /// The server answered in a way the client cannot interpret.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Coarse classification of [`Error`], for callers that only need to decide
/// how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response was received.
    Transport,
    /// The server answered with an error status.
    Server,
    /// The response could not be understood.
    Protocol,
    /// Local validation, including use of a deleted wrapper.
    Validation,
    MissingLink,
    TaskFailed,
    Timeout,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Api(abq_api::Error::Transport(_)) => ErrorKind::Transport,
            Self::Api(abq_api::Error::Status { .. }) => ErrorKind::Server,
            Self::Api(abq_api::Error::MissingLink(_)) | Self::MissingLink(_) => ErrorKind::MissingLink,
            Self::Api(_) | Self::Protocol(_) => ErrorKind::Protocol,
            Self::Validation(_)
            | Self::Deleted { .. }
            | Self::InvalidNetworkType { .. }
            | Self::Unsupported(_) => ErrorKind::Validation,
            Self::TaskFailed { .. } => ErrorKind::TaskFailed,
            Self::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<abq_api::Error> for Error {
    fn from(err: abq_api::Error) -> Self {
        match err {
            abq_api::Error::MissingLink(missing) => Self::MissingLink(missing),
            abq_api::Error::Protocol(msg) => Self::Protocol(msg),
            other => Self::Api(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_link_is_not_wrapped_as_api_error() {
        let err: Error = abq_api::Error::from(MissingLink { rel: "edit".into() }).into();
        assert!(matches!(err, Error::MissingLink(ref m) if m.rel == "edit"));
        assert_eq!(err.kind(), ErrorKind::MissingLink);
    }

    #[test]
    fn test_timeout_and_failure_are_distinct() {
        let timeout = Error::Timeout {
            operation: "task 1".into(),
            timeout: Duration::from_secs(12),
        };
        let failed = Error::TaskFailed {
            task_id: "1".into(),
            detail: "no hypervisor available".into(),
        };
        assert_eq!(timeout.kind(), ErrorKind::Timeout);
        assert_eq!(failed.kind(), ErrorKind::TaskFailed);
        assert_eq!(failed.to_string(), "task 1 failed: no hypervisor available");
    }
}
