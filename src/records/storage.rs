use super::types::{BankRecord, Customer};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load the third-party bank records (a JSON array).
pub fn load_banks(path: &Path) -> Result<Vec<BankRecord>> {
    load_json_array(path, "bank records")
}

/// Load the customer records (a JSON array).
pub fn load_customers(path: &Path) -> Result<Vec<Customer>> {
    load_json_array(path, "customer records")
}

fn load_json_array<T: DeserializeOwned>(path: &Path, what: &str) -> Result<Vec<T>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} at {}", what, path.display()))?;

    let records: Vec<T> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {} in {}", what, path.display()))?;

    tracing::debug!(count = records.len(), path = %path.display(), "loaded {}", what);

    Ok(records)
}
