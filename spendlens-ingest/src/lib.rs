//! spendlens-ingest: bank-transaction CSV ingestion and the combined CSV
//! re-submitted to the categorization backend.

pub mod export;
pub mod statement;

pub use export::{COMBINED_FILE_NAME, COMBINED_HEADER, combined_csv};
pub use statement::{parse_statement, parse_statement_path};
