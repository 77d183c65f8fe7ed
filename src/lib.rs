//! Administrative utilities for a Caspio-hosted database account.
//!
//! Everything in this crate is glue around one reusable piece:
//! [`api::ApiClient`], which exchanges OAuth2 client credentials for a
//! bearer token at the account's token endpoint and then issues single
//! authenticated calls against the REST v2 resource endpoints. The
//! binaries under `src/bin/` wire that client to individual
//! administrative tasks (listing tables, adding a column, sampling
//! records), each as its own short-lived process.

pub mod api;
pub mod config;
pub mod pricing;

pub use api::{AccessToken, ApiClient, ApiError, AuthError, ColumnDefinition};
pub use config::{Config, ConfigError, Credentials};
