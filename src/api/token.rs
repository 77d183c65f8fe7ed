use std::fmt;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A bearer token resolved for this process run.
///
/// Nothing here tracks expiry: every utility acquires one token, uses it
/// for its handful of calls, and exits. `obtained_at` is diagnostic
/// metadata only.
#[derive(Debug, Clone)]
pub struct AccessToken {
    value: String,
    obtained_at: DateTime<Utc>,
}

impl AccessToken {
    pub(crate) fn new(value: String) -> Self {
        Self {
            value,
            obtained_at: Utc::now(),
        }
    }

    /// The raw token, exactly as placed into the `Authorization` header.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// When this token was resolved.
    pub fn obtained_at(&self) -> DateTime<Utc> {
        self.obtained_at
    }
}

/// The token endpoint's response body.
///
/// `access_token` stays optional so a success status with an unusable
/// body surfaces as a structured failure rather than a decode panic.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
}

/// Possible failures while resolving an access token.
#[derive(Debug)]
pub enum AuthError {
    /// The client ID or secret was empty; nothing was sent.
    MissingCredentials,
    /// The token endpoint answered with a non-success status.
    /// The body is kept verbatim for diagnostics.
    Rejected { status: u16, body: String },
    /// The token endpoint answered with a success status but without a
    /// usable `access_token` field.
    MalformedBody { body: String },
    /// The transport failed before any response was produced.
    Transport(reqwest::Error),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingCredentials => {
                write!(f, "a client ID and secret are required to exchange for a token")
            }
            AuthError::Rejected { status, body } => {
                write!(f, "token endpoint rejected the exchange with HTTP {status}: {body}")
            }
            AuthError::MalformedBody { body } => {
                write!(f, "token endpoint answered without an access_token: {body}")
            }
            AuthError::Transport(error) => {
                write!(f, "token request failed in transport: {error}")
            }
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::Transport(error) => Some(error),
            _ => None,
        }
    }
}
