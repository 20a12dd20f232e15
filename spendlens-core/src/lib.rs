//! spendlens-core: transaction model, category aggregation, prediction
//! reconciliation, merchant extraction and the filter engine.
//!
//! Nothing in here performs IO. Network calls are described as jobs by
//! [`DashboardState`] and executed by `spendlens-client`.

pub mod aggregate;
pub mod dashboard;
pub mod filter;
pub mod merchants;
pub mod model;
pub mod payload;
pub mod reconcile;

pub use aggregate::{CategoryAggregate, summarize_rows, top_n_plus_other, with_default_categories};
pub use dashboard::{
    DashboardSettings, DashboardState, ManualEntry, RefineJob, RequestFamily, SuggestionJob, Ticket,
    count_uncategorized,
};
pub use filter::{
    FilterMode, FilterState, base_rows, category_breakdown, known_categories,
    resolve_category_alias,
};
pub use merchants::{MerchantTokenizer, extract_merchants};
pub use model::{
    CategorySummary, FeedbackSample, LedgerRow, PredictedRow, RefineRow, Refinement,
    TransactionRow, UNCATEGORIZED, parse_amount, parse_date, sort_by_date_desc,
};
pub use payload::{
    FeedbackRequest, RefineRequest, SavingsItem, SuggestionQuery, SummaryPayload,
};
pub use reconcile::{
    ReviewItem, apply_fix, merge_refinements, merge_refinements_at, uncategorized_for_review,
    uncategorized_positions,
};
