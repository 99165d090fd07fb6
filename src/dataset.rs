//! Load-once access to the sales transaction dataset.
//!
//! The dataset is read from CSV a single time at process start and handed
//! around by reference; every filtered view and aggregate is recomputed
//! from it on demand.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::{info, warn};

use crate::models::{CsvRecord, Transaction};

/// Logical columns the loader refuses to proceed without. Each entry lists
/// the accepted header spellings (canonical name first).
const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("Order ID", &["Order ID"]),
    ("Order Date", &["Order Date"]),
    ("Sales Amount", &["Sales Amount", "Final Sales Amount (INR)", "Sales"]),
    ("Profit (INR)", &["Profit (INR)", "Profit"]),
    ("Quantity", &["Quantity"]),
    ("Discount", &["Discount"]),
    ("Category", &["Category"]),
    ("Product Name", &["Product Name"]),
    ("State", &["State"]),
    ("City", &["City"]),
    ("Payment Method", &["Payment Method"]),
    ("Order Status", &["Order Status"]),
];

/// In-memory sales dataset, loaded once and immutable afterwards.
#[derive(Debug)]
pub struct Dataset {
    transactions: Vec<Transaction>,
}

impl Dataset {
    /// Load and parse the CSV export. Fails if the file is missing, a
    /// required column is absent, or no row parses; individually malformed
    /// rows are skipped with a warning.
    pub fn load(path: &Path) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("cannot open dataset at {}", path.display()))?;

        validate_headers(reader.headers().context("cannot read CSV headers")?)?;

        let mut transactions = Vec::new();
        let mut skipped = 0usize;
        for (i, row) in reader.deserialize::<CsvRecord>().enumerate() {
            let parsed = row
                .map_err(anyhow::Error::from)
                .and_then(|r| r.to_transaction());
            match parsed {
                Ok(tx) => transactions.push(tx),
                Err(e) => {
                    if skipped < 5 {
                        warn!("skipping row {}: {e:#}", i + 2);
                    }
                    skipped += 1;
                }
            }
        }

        if transactions.is_empty() {
            bail!(
                "no usable rows in {} ({skipped} skipped)",
                path.display()
            );
        }
        info!(
            "loaded {} transactions from {} ({skipped} skipped)",
            transactions.len(),
            path.display()
        );

        Ok(Dataset { transactions })
    }

    /// Build a dataset from already-parsed transactions.
    pub fn from_transactions(transactions: Vec<Transaction>) -> Dataset {
        Dataset { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Earliest and latest order dates in the dataset.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.transactions.iter().map(|t| t.order_date.date()).min()?;
        let max = self.transactions.iter().map(|t| t.order_date.date()).max()?;
        Some((min, max))
    }

    pub fn states(&self) -> Vec<String> {
        distinct(self.transactions.iter().map(|t| t.state.as_str()))
    }

    pub fn categories(&self) -> Vec<String> {
        distinct(self.transactions.iter().map(|t| t.category.as_str()))
    }

    pub fn cities(&self) -> Vec<String> {
        distinct(self.transactions.iter().map(|t| t.city.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = values.collect();
    set.into_iter().map(String::from).collect()
}

fn validate_headers(headers: &csv::StringRecord) -> Result<()> {
    let present: Vec<&str> = headers.iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|(_, accepted)| !accepted.iter().any(|a| present.contains(a)))
        .map(|(canonical, _)| *canonical)
        .collect();
    if !missing.is_empty() {
        bail!("dataset is missing required columns: {}", missing.join(", "));
    }
    Ok(())
}
