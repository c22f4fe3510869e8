//! Request authentication.
//!
//! Abiquo accepts either HTTP Basic credentials or a previously issued
//! session token sent back as the `auth` cookie. The mode is chosen from the
//! credential fields supplied when the client is built.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::{AUTHORIZATION, COOKIE, HeaderName, HeaderValue};

use crate::error::{Error, Result};

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Basic { user: String, password: String },
    Token(String),
}

impl Credentials {
    pub fn basic(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Select the authentication mode from an identity and an optional
    /// credential: with a credential the identity is a user name, without
    /// one it is a session token.
    pub fn from_identity(identity: impl Into<String>, credential: Option<String>) -> Self {
        match credential {
            Some(password) => Self::basic(identity, password),
            None => Self::token(identity),
        }
    }

    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic { .. })
    }

    /// The header that carries these credentials, and its value.
    pub fn header(&self) -> Result<(HeaderName, HeaderValue)> {
        let (name, value) = match self {
            Self::Basic { user, password } => {
                let encoded = STANDARD.encode(format!("{user}:{password}"));
                (AUTHORIZATION, format!("Basic {encoded}"))
            }
            Self::Token(token) => (COOKIE, format!("auth={token}")),
        };
        let mut value = HeaderValue::from_str(&value)
            .map_err(|_| Error::Protocol(format!("credentials are not a valid {name} header")))?;
        value.set_sensitive(true);
        Ok((name, value))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .field("password", &"<redacted>")
                .finish(),
            Self::Token(_) => f.debug_tuple("Token").field(&"<redacted>").finish(),
        }
    }
}
