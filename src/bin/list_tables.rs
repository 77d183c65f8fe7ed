use std::process;

use caspioctl::api::ApiClient;
use caspioctl::config::Config;
use log::error;
use reqwest::Method;

/// Lists the name of every table in the configured account.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

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

    let tables = match client.call(Method::GET, "tables", &token, None) {
        Ok(payload) => payload,
        Err(error) => {
            error!("unable to list tables: {error}");
            process::exit(1);
        }
    };

    match tables.as_array() {
        Some(names) => {
            println!("{} table(s):", names.len());
            for name in names {
                match name.as_str() {
                    Some(text) => println!("  {text}"),
                    None => println!("  {name}"),
                }
            }
        }
        // Not the envelope we expected; show whatever came back.
        None => println!("{tables}"),
    }
}
