use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Problems encountered while reading a price book.
#[derive(Debug)]
pub enum PricingError {
    Io { path: PathBuf, source: io::Error },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::Io { path, source } => {
                write!(f, "unable to read {}: {source}", path.display())
            }
            PricingError::Parse { path, source } => {
                write!(f, "{} is not a valid price book: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PricingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PricingError::Io { source, .. } => Some(source),
            PricingError::Parse { source, .. } => Some(source),
        }
    }
}

/// A locally maintained price book: every case we quote, with its
/// options and discounts. This never touches the network.
#[derive(Debug, Deserialize)]
pub struct PriceBook {
    pub cases: Vec<CaseSpec>,
}

/// One quotable case.
#[derive(Debug, Deserialize)]
pub struct CaseSpec {
    pub name: String,
    pub base_price: f64,
    pub units: u32,
    #[serde(default)]
    pub options: Vec<CaseOption>,
    /// Percentage taken off the final price, e.g. `10.0` for 10%.
    pub discount_percent: Option<f64>,
}

/// A priced add-on applied to every unit in a case.
#[derive(Debug, Deserialize)]
pub struct CaseOption {
    pub name: String,
    pub price: f64,
}

impl PriceBook {
    /// Reads and parses a price book from disk.
    pub fn from_path(path: &Path) -> Result<Self, PricingError> {
        let contents = fs::read_to_string(path).map_err(|source| PricingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| PricingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The sum of every case price in the book.
    pub fn grand_total(&self) -> f64 {
        self.cases.iter().map(CaseSpec::total).sum()
    }
}

impl CaseSpec {
    /// The computed price for the whole case: `(base + options) × units`,
    /// less any percentage discount.
    pub fn total(&self) -> f64 {
        let per_unit: f64 =
            self.base_price + self.options.iter().map(|option| option.price).sum::<f64>();
        let gross = per_unit * f64::from(self.units);
        match self.discount_percent {
            Some(discount) => gross * (1.0 - discount / 100.0),
            None => gross,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book(value: serde_json::Value) -> PriceBook {
        serde_json::from_value(value).expect("price book should parse")
    }

    #[test]
    fn a_bare_case_multiplies_base_price_by_units() {
        let book = book(json!({
            "cases": [{"name": "Standard", "base_price": 12.5, "units": 4}]
        }));
        assert_eq!(book.cases[0].total(), 50.0);
    }

    #[test]
    fn options_are_added_per_unit() {
        let book = book(json!({
            "cases": [{
                "name": "Deluxe",
                "base_price": 10.0,
                "units": 2,
                "options": [
                    {"name": "engraving", "price": 3.0},
                    {"name": "gift wrap", "price": 2.0}
                ]
            }]
        }));
        assert_eq!(book.cases[0].total(), 30.0);
    }

    #[test]
    fn discounts_come_off_the_gross() {
        let book = book(json!({
            "cases": [{
                "name": "Bulk",
                "base_price": 100.0,
                "units": 10,
                "discount_percent": 10.0
            }]
        }));
        assert_eq!(book.cases[0].total(), 900.0);
    }

    #[test]
    fn zero_units_price_at_zero() {
        let book = book(json!({
            "cases": [{"name": "Empty", "base_price": 99.0, "units": 0}]
        }));
        assert_eq!(book.cases[0].total(), 0.0);
    }

    #[test]
    fn the_grand_total_sums_all_cases() {
        let book = book(json!({
            "cases": [
                {"name": "A", "base_price": 1.0, "units": 1},
                {"name": "B", "base_price": 2.0, "units": 3}
            ]
        }));
        assert_eq!(book.grand_total(), 7.0);
    }

    #[test]
    fn missing_files_report_the_path() {
        let error = PriceBook::from_path(Path::new("does/not/exist.json"))
            .expect_err("a missing file should fail");
        assert!(matches!(error, PricingError::Io { .. }));
        assert!(error.to_string().contains("does/not/exist.json"));
    }
}
