//! Reference fee schedule: procedure code → median price.
//!
//! Loaded once at process start from a precomputed two-column CSV and shared
//! read-only across requests. A missing file degrades the feature set
//! (price-dependent rules produce no findings) instead of failing startup.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("Failed to read fee schedule: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed fee schedule row: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the precomputed fee schedule.
#[derive(Debug, Deserialize)]
struct PriceRow {
    cpt_code: String,
    median_price: f64,
}

/// Read-only mapping from procedure code to median price.
///
/// An absent entry means "no pricing opinion"; only the invalid-code rule
/// treats absence from the vocabulary as an error condition.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<String, f64>,
}

impl PriceTable {
    /// Load the table from a `cpt_code,median_price` CSV.
    ///
    /// Rows with a non-positive price are dropped; duplicate codes keep the
    /// first occurrence.
    pub fn load(path: &Path) -> Result<Self, PricingError> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut prices = HashMap::new();

        for row in reader.deserialize() {
            let row: PriceRow = row?;
            if row.median_price <= 0.0 {
                continue;
            }
            prices.entry(row.cpt_code.trim().to_string()).or_insert(row.median_price);
        }

        tracing::info!(entries = prices.len(), path = %path.display(), "Fee schedule loaded");
        Ok(Self { prices })
    }

    /// Load the table, or serve an empty one when the file is unusable.
    /// Price-dependent validation rules are skipped against an empty table.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Fee schedule unavailable, pricing validation disabled"
                );
                Self::default()
            }
        }
    }

    /// Build a table from in-memory pairs. Used by tests and embedding callers.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Self {
            prices: pairs.into_iter().map(|(c, p)| (c.into(), p)).collect(),
        }
    }

    /// Median price for a code, if the schedule has an opinion.
    pub fn price_for(&self, code: &str) -> Option<f64> {
        self.prices.get(code).copied()
    }

    /// Whether the code exists in the schedule's vocabulary.
    pub fn contains(&self, code: &str) -> bool {
        self.prices.contains_key(code)
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }
}
