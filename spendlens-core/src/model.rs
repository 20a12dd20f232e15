//! Transaction, prediction and summary types shared by every layer.
//!
//! Field names on the wire follow the categorization backend
//! (`Date`, `Description`, `Amount`, `PredictedCategory`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Category assigned to rows that carry none (or only whitespace).
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Name of the synthetic bucket produced by the top-N reducer.
pub const OTHER: &str = "Other";

/// Categories that always appear in the manual aggregate, even at zero.
pub const DEFAULT_CATEGORIES: [&str; 5] = [
    "Bars & Pubs",
    "Clothing & Apparel",
    "Food & Dining",
    "Retail",
    "Transfers",
];

/// Label set used until the backend answers `/nlp/labels`.
pub const DEFAULT_LABELS: [&str; 15] = [
    "Dining",
    "Groceries",
    "Shopping",
    "Transportation",
    "Utilities",
    "Housing",
    "Health",
    "Entertainment",
    "Subscriptions",
    "Transfers",
    "Income",
    "Fees",
    "Travel",
    "Education",
    "Uncategorized",
];

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%b-%Y"];

/// Trim a category and fall back to [`UNCATEGORIZED`] when nothing is left.
pub fn resolve_category(raw: Option<&str>) -> &str {
    match raw.map(str::trim) {
        Some(c) if !c.is_empty() => c,
        _ => UNCATEGORIZED,
    }
}

/// Parse a statement amount. Thousands separators and a leading `$` are
/// tolerated; anything else unparseable counts as zero.
pub fn parse_amount(raw: &str) -> f64 {
    let cleaned = raw.trim().replace(',', "");
    let cleaned = match cleaned.strip_prefix('-') {
        Some(rest) => format!("-{}", rest.trim_start_matches('$')),
        None => cleaned.trim_start_matches('$').to_string(),
    };
    cleaned.parse().unwrap_or(0.0)
}

/// Best-effort date parse used for ordering rows. Unknown formats yield `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Newest first. Rows whose date cannot be parsed keep their relative order at the end.
pub fn sort_by_date_desc(rows: &mut [TransactionRow]) {
    rows.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
}

/// Common read access over raw rows and predicted rows.
pub trait LedgerRow {
    fn date(&self) -> &str;
    fn description(&self) -> &str;
    fn amount(&self) -> f64;
    /// Resolved category: trimmed, [`UNCATEGORIZED`] when missing or blank.
    fn category(&self) -> &str;

    fn is_spending(&self) -> bool {
        self.amount() < 0.0
    }

    fn is_earning(&self) -> bool {
        self.amount() > 0.0
    }

    fn is_uncategorized(&self) -> bool {
        self.category() == UNCATEGORIZED
    }

    /// Structural identity: rows carry no id, so (date, description, amount) is it.
    fn same_transaction(&self, other: &impl LedgerRow) -> bool
    where
        Self: Sized,
    {
        self.date() == other.date()
            && self.description() == other.description()
            && self.amount() == other.amount()
    }
}

/// A locally known transaction: parsed from an uploaded CSV or entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Category", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TransactionRow {
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        category: Option<&str>,
    ) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
            category: category.map(str::to_string),
        }
    }

    pub fn parsed_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

impl LedgerRow for TransactionRow {
    fn date(&self) -> &str {
        &self.date
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        resolve_category(self.category.as_deref())
    }
}

/// Per-category aggregate. `total_amount == withdrawals + deposits` always holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "TransactionCount", default)]
    pub transaction_count: usize,
    #[serde(rename = "TotalAmount", default)]
    pub total_amount: f64,
    /// Sum of negative amounts (<= 0).
    #[serde(rename = "Withdrawals", default)]
    pub withdrawals: f64,
    /// Sum of non-negative amounts (>= 0).
    #[serde(rename = "Deposits", default)]
    pub deposits: f64,
}

impl CategorySummary {
    pub fn empty(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            transaction_count: 0,
            total_amount: 0.0,
            withdrawals: 0.0,
            deposits: 0.0,
        }
    }

    /// Fold one amount into the summary.
    pub fn record(&mut self, amount: f64) {
        self.transaction_count += 1;
        self.total_amount += amount;
        if amount >= 0.0 {
            self.deposits += amount;
        } else {
            self.withdrawals += amount;
        }
    }
}

/// A transaction annotated by the categorization backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedRow {
    #[serde(rename = "Date", default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(rename = "Description", default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_amount")]
    pub amount: f64,
    #[serde(rename = "PredictedCategory", default, deserialize_with = "lenient_text")]
    pub predicted_category: String,
    #[serde(rename = "Confidence", default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl PredictedRow {
    pub fn to_transaction(&self) -> TransactionRow {
        TransactionRow::new(
            self.date.clone(),
            self.description.clone(),
            self.amount,
            Some(self.category()),
        )
    }
}

impl LedgerRow for PredictedRow {
    fn date(&self) -> &str {
        &self.date
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn category(&self) -> &str {
        resolve_category(Some(self.predicted_category.as_str()))
    }
}

/// One row sent to `/nlp/refine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRow {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

/// One answer from `/nlp/refine`, positionally aligned with the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refinement {
    #[serde(rename = "PredictedCategory", default, deserialize_with = "lenient_text")]
    pub predicted_category: String,
    #[serde(rename = "Confidence", default)]
    pub confidence: Option<f64>,
}

/// A user correction reported to `/nlp/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackSample {
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "CorrectCategory")]
    pub correct_category: String,
}

/// Accepts a number, a numeric string, or null.
fn lenient_amount<'de, D>(de: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => parse_amount(&s),
        None => 0.0,
    })
}

/// Accepts a string, a bare number (dates exported as numbers), or null.
fn lenient_text<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Option::<Raw>::deserialize(de)? {
        Some(Raw::Text(s)) => s,
        Some(Raw::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
