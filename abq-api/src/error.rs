use reqwest::{Method, StatusCode};

use crate::link::MissingLink;
use crate::types::ErrorDto;

/// Errors returned by the low-level Abiquo API client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent or no response was received.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{method} {url} failed with {status}{}", describe(.errors))]
    Status {
        status: StatusCode,
        method: Method,
        url: String,
        /// Decoded `<errors>` body, when the server sent one.
        errors: Vec<ErrorDto>,
        body: String,
    },

    /// XML payload could not be encoded or decoded.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A link-driven call was attempted on an entity lacking the relation.
    #[error(transparent)]
    MissingLink(#[from] MissingLink),

    /// The server response did not follow the expected contract.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl Error {
    /// HTTP status of a [`Error::Status`] error.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

fn describe(errors: &[ErrorDto]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let detail: Vec<String> = errors
        .iter()
        .map(|e| format!("{}: {}", e.code, e.message))
        .collect();
    format!(" ({})", detail.join("; "))
}

pub type Result<T> = std::result::Result<T, Error>;
