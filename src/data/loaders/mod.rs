//! Complaint ingestion
//!
//! Reads the CFPB complaint export (CSV), keeps rows in the covered product
//! set, drops rows without a narrative, and attaches the cleaned narrative
//! used for retrieval. Sampling policy beyond this filter is up to the
//! caller.

use crate::data::{Complaint, Product};
use crate::error::{RagError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

/// Boilerplate opener stripped from narratives before indexing.
const BOILERPLATE: &str = "i am writing to file a complaint";

static DISALLOWED_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9\s.,!?]").expect("valid charset regex"));
static WHITESPACE_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Clean a narrative for chunking and retrieval.
///
/// Lowercases, strips the standard boilerplate opener, removes characters
/// outside the kept set, and collapses whitespace runs. The original text is
/// preserved elsewhere; this output feeds the chunker and both indexes.
pub fn clean_narrative(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_boilerplate = lowered.replace(BOILERPLATE, "");
    let filtered = DISALLOWED_CHARS.replace_all(&without_boilerplate, "");
    WHITESPACE_RUNS.replace_all(&filtered, " ").trim().to_string()
}

/// Raw CSV row as exported by the complaint database.
#[derive(Debug, Deserialize)]
struct RawComplaint {
    #[serde(rename = "Complaint ID")]
    id: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Consumer complaint narrative")]
    narrative: Option<String>,
}

/// Loader for the complaint CSV export.
pub struct CsvComplaintLoader;

impl CsvComplaintLoader {
    /// Load complaints from `path`, filtered to the covered product set.
    ///
    /// Rows with a missing or empty narrative produce no complaint record.
    pub fn load(&self, path: &Path) -> Result<Vec<Complaint>> {
        if !path.exists() {
            return Err(RagError::Configuration(format!(
                "complaint data file not found at: {}",
                path.display()
            )));
        }

        tracing::info!("Loading complaints from {}", path.display());

        let mut reader = csv::Reader::from_path(path).map_err(|e| {
            RagError::Configuration(format!(
                "failed to open complaint data at {}: {e}",
                path.display()
            ))
        })?;

        let mut complaints = Vec::new();
        let mut skipped_product = 0usize;
        let mut skipped_empty = 0usize;

        for row in reader.deserialize::<RawComplaint>() {
            let row = row.map_err(|e| {
                RagError::Configuration(format!("malformed complaint row: {e}"))
            })?;

            let Some(product) = Product::from_raw(&row.product) else {
                skipped_product += 1;
                continue;
            };

            let narrative = match row.narrative {
                Some(n) if !n.trim().is_empty() => n,
                _ => {
                    skipped_empty += 1;
                    continue;
                }
            };

            complaints.push(Complaint::new(row.id, product, narrative));
        }

        tracing::info!(
            "Loaded {} complaints ({} outside product set, {} without narrative)",
            complaints.len(),
            skipped_product,
            skipped_empty
        );

        Ok(complaints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_clean_narrative() {
        assert_eq!(
            clean_narrative("I am writing to file a complaint. FIX THIS!"),
            ". fix this!"
        );
        assert_eq!(clean_narrative("   Hello   World   "), "hello world");
        assert_eq!(clean_narrative("charged $50 (twice)"), "charged 50 twice");
    }

    #[test]
    fn test_load_filters_products_and_empty_narratives() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Complaint ID,Product,Consumer complaint narrative").unwrap();
        writeln!(file, "1,Credit card or prepaid card,Unauthorized charge on my card").unwrap();
        writeln!(file, "2,Mortgage,Should be filtered out").unwrap();
        writeln!(file, "3,Debt collection,").unwrap();
        writeln!(file, "4,Debt collection,Collector calls at night").unwrap();

        let complaints = CsvComplaintLoader.load(file.path()).unwrap();

        assert_eq!(complaints.len(), 2);
        assert_eq!(complaints[0].id, "1");
        assert_eq!(complaints[0].product, Product::CreditCard);
        assert_eq!(complaints[1].id, "4");
        assert_eq!(complaints[1].product, Product::DebtCollection);
        assert_eq!(complaints[1].cleaned, "collector calls at night");
    }

    #[test]
    fn test_load_missing_file_is_configuration_error() {
        let result = CsvComplaintLoader.load(Path::new("/nonexistent/complaints.csv"));
        assert!(matches!(result, Err(RagError::Configuration(_))));
    }
}
