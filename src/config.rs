use std::env;
use std::fmt;

use url::Url;

/// Environment variable holding the account's API base URL.
const BASE_URL_VAR: &str = "CASPIO_BASE_URL";
/// Environment variable holding the OAuth2 client ID.
const CLIENT_ID_VAR: &str = "CASPIO_CLIENT_ID";
/// Environment variable holding the OAuth2 client secret.
const CLIENT_SECRET_VAR: &str = "CASPIO_CLIENT_SECRET";
/// Environment variable holding a pre-issued bearer token.
/// When set, the client ID/secret pair is ignored entirely.
const ACCESS_TOKEN_VAR: &str = "CASPIO_ACCESS_TOKEN";

/// Problems encountered while assembling configuration.
/// All of these are fatal before any network traffic occurs.
#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    EmptyVar(&'static str),
    InvalidBaseUrl(url::ParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(name) => {
                write!(f, "required environment variable {name} is not set")
            }
            ConfigError::EmptyVar(name) => {
                write!(f, "environment variable {name} is set but empty")
            }
            ConfigError::InvalidBaseUrl(error) => {
                write!(f, "{BASE_URL_VAR} is not a valid URL: {error}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBaseUrl(error) => Some(error),
            _ => None,
        }
    }
}

/// How we authenticate against the account's API.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A client ID/secret pair to exchange at the token endpoint.
    ClientCredentials {
        client_id: String,
        client_secret: String,
    },
    /// A pre-issued token, used as-is with no exchange.
    StaticToken { token: String },
}

/// Process-wide configuration, assembled exactly once at startup.
///
/// Nothing downstream reads the environment again; the config is passed
/// by parameter into whatever needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub credentials: Credentials,
}

impl Config {
    /// Assembles configuration from the process environment, loading a
    /// `.env` file first when one is present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Assembles configuration from an arbitrary variable source.
    /// Split out so tests never have to mutate the real environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_base = required(&lookup, BASE_URL_VAR)?;
        let base_url = Url::parse(&raw_base).map_err(ConfigError::InvalidBaseUrl)?;

        // A pre-issued token takes precedence: with one in hand, the
        // exchange pair is redundant and never consulted.
        if let Some(token) = lookup(ACCESS_TOKEN_VAR).filter(|token| !token.trim().is_empty()) {
            return Ok(Self {
                base_url,
                credentials: Credentials::StaticToken { token },
            });
        }

        let client_id = required(&lookup, CLIENT_ID_VAR)?;
        let client_secret = required(&lookup, CLIENT_SECRET_VAR)?;
        Ok(Self {
            base_url,
            credentials: Credentials::ClientCredentials {
                client_id,
                client_secret,
            },
        })
    }
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Err(ConfigError::MissingVar(name)),
        Some(value) if value.trim().is_empty() => Err(ConfigError::EmptyVar(name)),
        Some(value) => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + '_ {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name| map.get(name).map(|value| value.to_string())
    }

    #[test]
    fn base_url_is_mandatory() {
        let source = lookup(&[("CASPIO_CLIENT_ID", "x"), ("CASPIO_CLIENT_SECRET", "y")]);
        match Config::from_lookup(source) {
            Err(ConfigError::MissingVar(name)) => assert_eq!(name, "CASPIO_BASE_URL"),
            other => panic!("expected a missing-variable error, got {other:?}"),
        }
    }

    #[test]
    fn base_url_must_parse() {
        let source = lookup(&[
            ("CASPIO_BASE_URL", "not a url"),
            ("CASPIO_CLIENT_ID", "x"),
            ("CASPIO_CLIENT_SECRET", "y"),
        ]);
        assert!(matches!(
            Config::from_lookup(source),
            Err(ConfigError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn client_credentials_require_both_halves() {
        let source = lookup(&[
            ("CASPIO_BASE_URL", "https://api.example.com"),
            ("CASPIO_CLIENT_ID", "x"),
        ]);
        match Config::from_lookup(source) {
            Err(ConfigError::MissingVar(name)) => assert_eq!(name, "CASPIO_CLIENT_SECRET"),
            other => panic!("expected a missing-variable error, got {other:?}"),
        }
    }

    #[test]
    fn whitespace_only_values_are_rejected() {
        let source = lookup(&[
            ("CASPIO_BASE_URL", "https://api.example.com"),
            ("CASPIO_CLIENT_ID", "x"),
            ("CASPIO_CLIENT_SECRET", "   "),
        ]);
        match Config::from_lookup(source) {
            Err(ConfigError::EmptyVar(name)) => assert_eq!(name, "CASPIO_CLIENT_SECRET"),
            other => panic!("expected an empty-variable error, got {other:?}"),
        }
    }

    #[test]
    fn client_credentials_are_assembled() {
        let source = lookup(&[
            ("CASPIO_BASE_URL", "https://api.example.com"),
            ("CASPIO_CLIENT_ID", "x"),
            ("CASPIO_CLIENT_SECRET", "y"),
        ]);
        let config = Config::from_lookup(source).expect("config should assemble");
        match config.credentials {
            Credentials::ClientCredentials {
                client_id,
                client_secret,
            } => {
                assert_eq!(client_id, "x");
                assert_eq!(client_secret, "y");
            }
            other => panic!("expected client credentials, got {other:?}"),
        }
    }

    #[test]
    fn a_supplied_token_wins_over_the_exchange_pair() {
        let source = lookup(&[
            ("CASPIO_BASE_URL", "https://api.example.com"),
            ("CASPIO_CLIENT_ID", "x"),
            ("CASPIO_CLIENT_SECRET", "y"),
            ("CASPIO_ACCESS_TOKEN", "abc"),
        ]);
        let config = Config::from_lookup(source).expect("config should assemble");
        assert!(matches!(
            config.credentials,
            Credentials::StaticToken { ref token } if token == "abc"
        ));
    }
}
