//! Regenerate the `Date,Description,Amount,Category` CSV submitted to the
//! backend after manual entries are combined with uploaded rows.

use anyhow::{Context, Result, anyhow};
use spendlens_core::TransactionRow;

pub const COMBINED_HEADER: [&str; 4] = ["Date", "Description", "Amount", "Category"];

/// File name the combined upload is sent under.
pub const COMBINED_FILE_NAME: &str = "combined.csv";

/// Serialize rows (with header) to CSV bytes. A missing category is written
/// empty; amounts use the shortest text that parses back to the same value.
pub fn combined_csv(rows: &[TransactionRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(COMBINED_HEADER).context("writing csv header")?;
    for row in rows {
        let amount = row.amount.to_string();
        wtr.write_record([
            row.date.as_str(),
            row.description.as_str(),
            amount.as_str(),
            row.category.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("writing row {:?}", row.description))?;
    }
    wtr.into_inner().map_err(|e| anyhow!("flushing combined csv: {e}"))
}
