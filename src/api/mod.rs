mod client;
mod token;

pub use client::{ApiClient, ApiError, ColumnDefinition};
pub use token::{AccessToken, AuthError};
