//! Complaint data model
//!
//! Source records and the per-chunk metadata that travels with every row of
//! the dense index. The original narrative is kept verbatim for display;
//! retrieval always works on the cleaned text.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod chunkers;
pub mod loaders;

// Re-exports for convenience
pub use chunkers::{ChunkConfig, RecursiveChunker};
pub use loaders::{clean_narrative, CsvComplaintLoader};

/// Closed set of product categories covered by the corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Product {
    #[serde(rename = "Credit card")]
    CreditCard,
    #[serde(rename = "Savings account")]
    SavingsAccount,
    #[serde(rename = "Personal loan")]
    PersonalLoan,
    #[serde(rename = "Money transfers")]
    MoneyTransfers,
    #[serde(rename = "Debt collection")]
    DebtCollection,
}

impl Product {
    /// Map a raw CFPB product label onto the normalized category.
    ///
    /// Returns `None` for products outside the covered set; those rows are
    /// dropped at ingestion.
    pub fn from_raw(label: &str) -> Option<Self> {
        match label {
            "Credit card or prepaid card" => Some(Self::CreditCard),
            "Checking or savings account" => Some(Self::SavingsAccount),
            "Payday loan, title loan, personal loan, or advance loan" => {
                Some(Self::PersonalLoan)
            }
            "Money transfer, virtual currency, or money service" => {
                Some(Self::MoneyTransfers)
            }
            "Debt collection" => Some(Self::DebtCollection),
            _ => None,
        }
    }

    /// Normalized display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "Credit card",
            Self::SavingsAccount => "Savings account",
            Self::PersonalLoan => "Personal loan",
            Self::MoneyTransfers => "Money transfers",
            Self::DebtCollection => "Debt collection",
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source complaint record supplied by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Complaint {
    /// Stable, unique complaint identifier.
    pub id: String,
    /// Normalized product category.
    pub product: Product,
    /// Full original narrative, immutable once ingested.
    pub narrative: String,
    /// Cleaned narrative text used for chunking and retrieval.
    pub cleaned: String,
}

impl Complaint {
    /// Create a complaint record, cleaning the narrative for retrieval.
    pub fn new(id: String, product: Product, narrative: String) -> Self {
        let cleaned = clean_narrative(&narrative);
        Self {
            id,
            product,
            narrative,
            cleaned,
        }
    }
}

/// Per-chunk metadata, positionally aligned with the dense index.
///
/// `row_id` is assigned at build time and always equals the record's position
/// in the metadata list and its row in the dense index. Retrieval and fusion
/// refer to chunks by row id only, so two chunks with identical text remain
/// distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Dense-index row this record describes.
    pub row_id: usize,
    /// Identifier of the source complaint.
    pub complaint_id: String,
    /// Product category of the source complaint.
    pub product: Product,
    /// Chunk text (cleaned), the unit of embedding and BM25 scoring.
    pub text: String,
    /// Verbatim original narrative, kept for display.
    pub original_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_from_raw() {
        assert_eq!(
            Product::from_raw("Credit card or prepaid card"),
            Some(Product::CreditCard)
        );
        assert_eq!(Product::from_raw("Debt collection"), Some(Product::DebtCollection));
        assert_eq!(Product::from_raw("Mortgage"), None);
    }

    #[test]
    fn test_product_serde_uses_normalized_name() {
        let json = serde_json::to_string(&Product::MoneyTransfers).unwrap();
        assert_eq!(json, "\"Money transfers\"");

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Product::MoneyTransfers);
    }

    #[test]
    fn test_complaint_cleans_narrative() {
        let complaint = Complaint::new(
            "123".to_string(),
            Product::CreditCard,
            "I am writing to file a complaint. FIX THIS!".to_string(),
        );

        assert_eq!(complaint.narrative, "I am writing to file a complaint. FIX THIS!");
        assert_eq!(complaint.cleaned, ". fix this!");
    }
}
