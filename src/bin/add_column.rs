use std::env;
use std::process;

use caspioctl::api::{ApiClient, ColumnDefinition};
use caspioctl::config::Config;
use log::error;
use reqwest::Method;

/// The default length for text columns when none is baked into the type.
const DEFAULT_TEXT_LENGTH: u32 = 255;

/// Adds a column to a table: `add-column <table> <column> [type]`.
/// The type defaults to a plain text field.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let (table, column) = match (args.next(), args.next()) {
        (Some(table), Some(column)) => (table, column),
        _ => {
            eprintln!("usage: add-column <table> <column> [type]");
            process::exit(2);
        }
    };

    let mut definition = ColumnDefinition::text(&column, DEFAULT_TEXT_LENGTH);
    if let Some(column_type) = args.next() {
        // Non-text types carry no length; the service infers their size.
        definition.column_type = column_type;
        definition.length = None;
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("configuration is incomplete: {error}");
            process::exit(1);
        }
    };

    let client = ApiClient::new(&config);
    let token = match client.acquire_token(&config.credentials) {
        Ok(token) => token,
        Err(error) => {
            error!("unable to acquire an access token: {error}");
            process::exit(1);
        }
    };

    let payload = match serde_json::to_value(&definition) {
        Ok(payload) => payload,
        Err(error) => {
            error!("unable to encode the field definition: {error}");
            process::exit(1);
        }
    };

    let path = format!("tables/{table}/fields");
    match client.call(Method::POST, &path, &token, Some(&payload)) {
        Ok(_) => println!(
            "Added column {column} ({}) to {table}.",
            definition.column_type
        ),
        Err(error) => {
            error!("unable to add {column} to {table}: {error}");
            process::exit(1);
        }
    }
}
