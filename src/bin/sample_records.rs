use std::env;
use std::process;

use caspioctl::api::ApiClient;
use caspioctl::config::Config;
use log::error;
use reqwest::Method;
use serde_json::Value;

/// How many records to pull per table.
const SAMPLE_LIMIT: usize = 5;

/// Prints a small sample of records from each named table:
/// `sample-records <table> [table ...]`.
///
/// Every table is its own task: a failure is reported and the remaining
/// tables still run. The exit code reflects whether anything failed.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let tables: Vec<String> = env::args().skip(1).collect();
    if tables.is_empty() {
        eprintln!("usage: sample-records <table> [table ...]");
        process::exit(2);
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

    let mut failures = 0;
    for table in &tables {
        let path = format!("tables/{table}/records?q.limit={SAMPLE_LIMIT}");
        match client.call(Method::GET, &path, &token, None) {
            Ok(records) => print_sample(table, &records),
            Err(error) => {
                error!("unable to sample {table}: {error}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        process::exit(1);
    }
}

fn print_sample(table: &str, records: &Value) {
    match records.as_array() {
        Some(rows) => {
            println!("{table}: {} record(s)", rows.len());
            for row in rows {
                println!("  {row}");
            }
        }
        None => println!("{table}: {records}"),
    }
}
