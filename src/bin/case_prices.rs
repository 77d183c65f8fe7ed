use std::env;
use std::path::Path;
use std::process;

use caspioctl::pricing::PriceBook;
use log::error;

/// The price book read when no path is given on the command line.
const DEFAULT_BOOK: &str = "case_prices.json";

/// Prints computed case prices from a local price book. This utility is
/// fully offline.
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = env::args().nth(1).unwrap_or_else(|| DEFAULT_BOOK.to_string());
    let book = match PriceBook::from_path(Path::new(&path)) {
        Ok(book) => book,
        Err(error) => {
            error!("unable to load the price book: {error}");
            process::exit(1);
        }
    };

    for case in &book.cases {
        println!("{:<30} {:>10.2}", case.name, case.total());
    }
    println!("{:<30} {:>10.2}", "total", book.grand_total());
}
