//! Parse bank-transaction CSV exports into rows.
//!
//! Expected columns, in order: Date, Description, Amount, Category (optional).
//! A header is recognised only on the very first row, when its first three
//! cells contain "date", "desc" and "amount".

use anyhow::{Context, Result};
use spendlens_core::{TransactionRow, parse_amount};
use std::io::Read;
use std::path::Path;
use tracing::debug;

fn looks_like_header(record: &csv::StringRecord) -> bool {
    let cell = |i: usize| record.get(i).unwrap_or("").to_lowercase();
    cell(0).contains("date") && cell(1).contains("desc") && cell(2).contains("amount")
}

/// Parse CSV text from any reader. Rows with fewer than three fields are dropped.
pub fn parse_statement<R: Read>(reader: R) -> Result<Vec<TransactionRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (i, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("reading csv record {}", i + 1))?;
        if i == 0 && looks_like_header(&record) {
            continue;
        }
        if record.len() < 3 {
            dropped += 1;
            continue;
        }

        rows.push(TransactionRow {
            date: record.get(0).unwrap_or("").trim().to_string(),
            description: record.get(1).unwrap_or("").trim().to_string(),
            amount: parse_amount(record.get(2).unwrap_or("0")),
            category: record.get(3).map(|c| c.trim().to_string()),
        });
    }

    debug!(rows = rows.len(), dropped, "parsed statement");
    Ok(rows)
}

/// Parse a CSV file on disk.
pub fn parse_statement_path(path: impl AsRef<Path>) -> Result<Vec<TransactionRow>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_statement(file).with_context(|| format!("parsing {}", path.display()))
}
