//! JSON files read and written by the CLI.
//!
//! Record files are read leniently: each array element is parsed on its own,
//! and one that does not fit becomes an empty record for the aggregator to
//! count as malformed.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::arbitrage::ArbitrageResult;
use crate::bet::{BonusOffer, OddsQuote};
use crate::error::Result;
use crate::summary::ScanRecord;

fn read_array(path: &Path) -> Result<Vec<Value>> {
    let json = std::fs::read_to_string(path)?;
    let values: Vec<Value> = serde_json::from_str(&json)?;
    Ok(values)
}

fn load_list<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let json = std::fs::read_to_string(path)?;
    let items: Vec<T> = serde_json::from_str(&json)?;
    debug!(path = %path.display(), count = items.len(), "Loaded list");
    Ok(items)
}

/// Parse record values one by one; an element that does not fit becomes an
/// empty record.
pub fn records_from_values(values: Vec<Value>) -> Vec<ScanRecord> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).unwrap_or_else(|e| {
                warn!(index, error = %e, "Unparsable record");
                ScanRecord::default()
            })
        })
        .collect()
}

/// Load stored scan records.
///
/// Fails only when the file is unreadable or not a JSON array.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<ScanRecord>> {
    let path = path.as_ref();
    let records = records_from_values(read_array(path)?);

    info!(path = %path.display(), records = records.len(), "Loaded scan records");
    Ok(records)
}

/// Write results as a pretty-printed JSON array of records.
pub fn save_results(path: impl AsRef<Path>, results: &[ArbitrageResult]) -> Result<()> {
    let path = path.as_ref();
    let records: Vec<ScanRecord> = results.iter().cloned().map(ScanRecord::from).collect();
    let json = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, json)?;

    info!(path = %path.display(), results = records.len(), "Saved scan results");
    Ok(())
}

/// Load an odds snapshot.
pub fn load_quotes(path: impl AsRef<Path>) -> Result<Vec<OddsQuote>> {
    load_list(path.as_ref())
}

/// Load available bonus offers.
pub fn load_offers(path: impl AsRef<Path>) -> Result<Vec<BonusOffer>> {
    load_list(path.as_ref())
}
