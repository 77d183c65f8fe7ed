use std::fmt;

use log::{debug, error, info};
use reqwest::{blocking::Client, Method};
use serde::Serialize;
use serde_json::Value;

use super::token::{AccessToken, AuthError, TokenResponse};
use crate::config::{Config, Credentials};

/// The token endpoint, relative to the account base URL.
const TOKEN_PATH: &str = "oauth/token";

/// The prefix under which every resource endpoint lives.
const RESOURCE_PREFIX: &str = "rest/v2";

/// Possible failures for a single resource call.
#[derive(Debug)]
pub enum ApiError {
    /// The service answered with a non-success status. The body is kept
    /// verbatim for diagnostics.
    Status { status: u16, body: String },
    /// The service answered with a success status but a body we could
    /// not decode as JSON.
    Decode {
        body: String,
        source: serde_json::Error,
    },
    /// The transport failed before any response was produced.
    Transport(reqwest::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, body } => {
                write!(f, "service answered HTTP {status}: {body}")
            }
            ApiError::Decode { body, source } => {
                write!(f, "service answered with an undecodable body ({source}): {body}")
            }
            ApiError::Transport(error) => {
                write!(f, "request failed in transport: {error}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Decode { source, .. } => Some(source),
            ApiError::Transport(error) => Some(error),
            _ => None,
        }
    }
}

/// A field definition for a schema-change request.
///
/// The shape is dictated by the vendor; we serialize it PascalCase and
/// pass it through without further validation, leaving the service to
/// enforce its own rules.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ColumnDefinition {
    pub name: String,
    #[serde(rename = "Type")]
    pub column_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    pub unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_insert: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_update: Option<bool>,
    pub required: bool,
}

impl ColumnDefinition {
    /// A plain text field of the given length, with everything else left
    /// to server-side defaults.
    pub fn text(name: &str, length: u32) -> Self {
        Self {
            name: name.to_string(),
            column_type: "STRING".to_string(),
            length: Some(length),
            unique: false,
            label: None,
            description: None,
            display_order: None,
            on_insert: None,
            on_update: None,
            required: false,
        }
    }
}

/// Wraps token acquisition and single authenticated calls against the
/// account's REST API.
///
/// There is deliberately no retry, no token caching, and no pagination
/// here: every operation issues exactly one request and reports exactly
/// one outcome.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the configured account.
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    fn token_endpoint(&self) -> String {
        format!("{}/{}", self.base_url, TOKEN_PATH)
    }

    fn resource_endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url,
            RESOURCE_PREFIX,
            path.trim_start_matches('/')
        )
    }

    /// Resolves an access token for this run.
    ///
    /// A pre-issued token is wrapped as-is with no network traffic. A
    /// client ID/secret pair is exchanged at the token endpoint with a
    /// single form-encoded POST.
    pub fn acquire_token(&self, credentials: &Credentials) -> Result<AccessToken, AuthError> {
        let (client_id, client_secret) = match credentials {
            Credentials::StaticToken { token } => {
                debug!("using the pre-issued access token from configuration");
                return Ok(AccessToken::new(token.clone()));
            }
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => (client_id, client_secret),
        };

        // Refuse to hit the network with credentials we already know the
        // endpoint cannot accept.
        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let endpoint = self.token_endpoint();
        info!("POST {endpoint} (client-credentials exchange)");

        let response = self
            .http
            .post(endpoint.as_str())
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ])
            .send()
            .map_err(AuthError::Transport)?;

        let status = response.status();
        let body = response.text().map_err(AuthError::Transport)?;
        debug!("token endpoint answered {status}: {body}");

        if !status.is_success() {
            error!("token exchange rejected with HTTP {status}: {body}");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        // A success status with no usable token in the body is still a
        // failure; keep the body so the caller can see what came back.
        let Ok(parsed) = serde_json::from_str::<TokenResponse>(&body) else {
            return Err(AuthError::MalformedBody { body });
        };
        match parsed.access_token {
            Some(value) => {
                debug!(
                    "granted a {} token (expires_in: {:?})",
                    parsed.token_type.as_deref().unwrap_or("bearer"),
                    parsed.expires_in
                );
                Ok(AccessToken::new(value))
            }
            None => Err(AuthError::MalformedBody { body }),
        }
    }

    /// Issues exactly one authenticated request against a resource
    /// endpoint and returns the decoded JSON payload.
    ///
    /// List endpoints wrap their payload in a `Result` envelope; when
    /// present, the value underneath is returned directly. The full
    /// outcome of every call (status, headers, body) is recorded through
    /// the log facade for post-hoc diagnosis.
    pub fn call(
        &self,
        method: Method,
        path: &str,
        token: &AccessToken,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let endpoint = self.resource_endpoint(path);
        info!("{method} {endpoint}");

        let mut request = self
            .http
            .request(method, endpoint.as_str())
            .header("Authorization", format!("Bearer {}", token.value()))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().map_err(ApiError::Transport)?;

        let status = response.status();
        for (name, value) in response.headers() {
            debug!("response header {name}: {value:?}");
        }
        let body_text = response.text().map_err(ApiError::Transport)?;
        debug!("response status {status}, body: {body_text}");

        if !status.is_success() {
            error!("{endpoint} answered HTTP {status}: {body_text}");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: body_text,
            });
        }

        decode_payload(&body_text)
    }
}

/// Decodes a successful response body, peeling the vendor's `Result`
/// envelope when present. An empty body decodes to JSON `null`.
fn decode_payload(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    let decoded: Value = serde_json::from_str(body).map_err(|source| ApiError::Decode {
        body: body.to_string(),
        source,
    })?;

    match decoded {
        Value::Object(mut map) => match map.remove("Result") {
            Some(inner) => Ok(inner),
            None => Ok(Value::Object(map)),
        },
        other => Ok(other),
    }
}
