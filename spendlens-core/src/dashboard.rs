//! The dashboard's single owned state object.
//!
//! Every mutation goes through `&mut DashboardState`. Network work is
//! described by jobs carrying a [`Ticket`]; completions are handed back with
//! that ticket and dropped when a newer request of the same family has been
//! issued since.

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::aggregate::{CategoryAggregate, summarize_rows, top_n_plus_other};
use crate::filter::{FilterState, base_rows, known_categories};
use crate::merchants::MerchantTokenizer;
use crate::model::{
    CategorySummary, DEFAULT_LABELS, FeedbackSample, LedgerRow, PredictedRow, Refinement,
    TransactionRow, parse_amount, sort_by_date_desc,
};
use crate::payload::{RefineRequest, SavingsItem, SuggestionQuery, SummaryPayload};
use crate::reconcile::{
    REFINE_THRESHOLD, ReviewItem, apply_fix, merge_refinements_at, uncategorized_for_review,
    uncategorized_positions, uncategorized_refine_rows,
};

/// Async operation families that get their own request counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestFamily {
    Upload,
    Refinement,
    Suggestions,
}

/// Identifies one issued request. Only the latest ticket of a family is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub family: RequestFamily,
    pub token: u64,
}

#[derive(Debug, Clone, Default)]
struct RequestCounters {
    upload: u64,
    refinement: u64,
    suggestions: u64,
}

impl RequestCounters {
    fn slot(&mut self, family: RequestFamily) -> &mut u64 {
        match family {
            RequestFamily::Upload => &mut self.upload,
            RequestFamily::Refinement => &mut self.refinement,
            RequestFamily::Suggestions => &mut self.suggestions,
        }
    }

    fn issue(&mut self, family: RequestFamily) -> Ticket {
        let slot = self.slot(family);
        *slot += 1;
        Ticket { family, token: *slot }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        let latest = match ticket.family {
            RequestFamily::Upload => self.upload,
            RequestFamily::Refinement => self.refinement,
            RequestFamily::Suggestions => self.suggestions,
        };
        latest == ticket.token
    }

    /// Make every outstanding ticket of `family` stale.
    fn invalidate(&mut self, family: RequestFamily) {
        *self.slot(family) += 1;
    }
}

/// Tunables of the reconciliation and savings flow.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub use_ml: bool,
    pub refine_threshold: f64,
    pub chart_top_n: usize,
    pub top_categories: usize,
    pub merchant_limit: usize,
    pub max_items: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            use_ml: true,
            refine_threshold: REFINE_THRESHOLD,
            chart_top_n: 10,
            top_categories: 5,
            merchant_limit: 12,
            max_items: 12,
        }
    }
}

/// A manual entry as typed into the form: all text, validated on add.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualEntry {
    pub date: String,
    pub description: String,
    pub amount: String,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RefineJob {
    pub ticket: Ticket,
    pub request: RefineRequest,
    /// Predicted-row positions of `request.rows`.
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionJob {
    pub ticket: Ticket,
    pub query: SuggestionQuery,
}

pub struct DashboardState {
    settings: DashboardSettings,
    entries: Vec<TransactionRow>,
    aggregate: CategoryAggregate,
    server: Option<SummaryPayload>,
    labels: Vec<String>,
    filter: FilterState,
    savings: Vec<SavingsItem>,
    requests: RequestCounters,
    refine_positions: Vec<usize>,
    tokenizer: MerchantTokenizer,
    version: u64,
}

impl DashboardState {
    pub fn new(settings: DashboardSettings) -> Result<Self> {
        Ok(Self {
            settings,
            entries: Vec::new(),
            aggregate: CategoryAggregate::new(),
            server: None,
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
            filter: FilterState::default(),
            savings: Vec::new(),
            requests: RequestCounters::default(),
            refine_positions: Vec::new(),
            tokenizer: MerchantTokenizer::new()?,
            version: 0,
        })
    }

    // ---- read side ----

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    /// Bumps on every applied mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn entries(&self) -> &[TransactionRow] {
        &self.entries
    }

    pub fn aggregate(&self) -> &CategoryAggregate {
        &self.aggregate
    }

    pub fn server(&self) -> Option<&SummaryPayload> {
        self.server.as_ref()
    }

    pub fn predicted_rows(&self) -> Option<&[PredictedRow]> {
        self.server.as_ref().and_then(SummaryPayload::predicted_rows)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn savings(&self) -> &[SavingsItem] {
        &self.savings
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.requests.is_current(ticket)
    }

    /// Un-padded summary behind the charts, in list order: server predictions
    /// when ML is on and the server produced any, else the manual aggregate.
    fn source_summary(&self) -> &[CategorySummary] {
        let from_server = self
            .server
            .as_ref()
            .map(|s| s.category_summary.as_slice())
            .unwrap_or_default();
        if self.settings.use_ml && !from_server.is_empty() {
            from_server
        } else {
            self.aggregate.summaries()
        }
    }

    /// Summary feeding the charts: server predictions when ML is on and the
    /// server produced any, else the manual aggregate; reduced to top-N + Other.
    pub fn effective_summary(&self) -> Vec<CategorySummary> {
        let from_server = self
            .server
            .as_ref()
            .is_some_and(|s| !s.category_summary.is_empty());
        if self.settings.use_ml && from_server {
            top_n_plus_other(self.source_summary(), self.settings.chart_top_n)
        } else {
            top_n_plus_other(&self.aggregate.to_list(), self.settings.chart_top_n)
        }
    }

    pub fn filtered_rows(&self) -> Vec<TransactionRow> {
        self.filter
            .filter_rows(base_rows(self.predicted_rows(), &self.entries))
    }

    pub fn filtered_summary(&self) -> Vec<CategorySummary> {
        self.filter.filter_summary(&self.effective_summary())
    }

    /// Still-uncategorized predicted rows, largest amounts first.
    pub fn review_queue(&self) -> Vec<ReviewItem> {
        self.predicted_rows()
            .map(uncategorized_for_review)
            .unwrap_or_default()
    }

    /// Local rows as sent to `/savings/analyze` (no category column).
    pub fn analysis_transactions(&self) -> Vec<TransactionRow> {
        self.entries
            .iter()
            .map(|r| TransactionRow::new(r.date.clone(), r.description.clone(), r.amount, None))
            .collect()
    }

    // ---- local mutations ----

    pub fn set_use_ml(&mut self, use_ml: bool) {
        self.settings.use_ml = use_ml;
        self.bump();
    }

    /// Replace the label set. Empty answers keep the current labels.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        if labels.is_empty() {
            return;
        }
        self.labels = labels;
        self.bump();
    }

    /// Add one manual entry. Returns the full row set to re-submit, or
    /// `None` when date, description or amount is missing.
    pub fn add_manual_entry(&mut self, entry: ManualEntry) -> Option<Vec<TransactionRow>> {
        if entry.date.trim().is_empty()
            || entry.description.trim().is_empty()
            || entry.amount.trim().is_empty()
        {
            debug!("manual entry rejected: missing field");
            return None;
        }

        let row = TransactionRow::new(
            entry.date,
            entry.description,
            parse_amount(&entry.amount),
            Some(entry.category.as_str()),
        );
        self.aggregate.add_row(&row);
        self.entries.insert(0, row);
        sort_by_date_desc(&mut self.entries);
        self.bump();
        Some(self.entries.clone())
    }

    /// Fold parsed CSV rows into the local rows and the aggregate.
    pub fn ingest_rows(&mut self, rows: Vec<TransactionRow>) {
        self.aggregate.extend(&rows);
        self.entries.extend(rows);
        sort_by_date_desc(&mut self.entries);
        self.bump();
    }

    pub fn select_spending(&mut self) {
        self.filter.select_spending();
        self.bump();
    }

    pub fn select_earning(&mut self) {
        self.filter.select_earning();
        self.bump();
    }

    pub fn set_show_spending(&mut self, show_spending: bool) {
        self.filter.set_show_spending(show_spending);
        self.bump();
    }

    /// Select a category, resolving it against the categories of the local rows.
    pub fn click_category(&mut self, category: Option<&str>) {
        let known = known_categories(&self.entries);
        self.filter.click_category(category, &known);
        self.bump();
    }

    /// Manually set a predicted row's category. Returns the feedback sample
    /// to report, or `None` when there is nothing to fix at `index`.
    pub fn fix_category(&mut self, index: usize, category: &str) -> Option<FeedbackSample> {
        let fix = apply_fix(self.predicted_rows()?, index, category)?;
        self.replace_predictions(fix.rows);
        info!(index, category, "prediction fixed manually");
        Some(fix.feedback)
    }

    // ---- request lifecycle ----

    pub fn begin_upload(&mut self) -> Ticket {
        self.requests.issue(RequestFamily::Upload)
    }

    /// Install a backend summary. Stale uploads are dropped.
    pub fn apply_upload(&mut self, ticket: Ticket, payload: SummaryPayload) -> bool {
        if !self.requests.is_current(ticket) {
            warn!(token = ticket.token, "discarding stale upload response");
            return false;
        }
        debug!(
            categories = payload.category_summary.len(),
            predicted = payload.predicted_rows().map(|r| r.len()).unwrap_or(0),
            "upload response applied"
        );
        self.server = Some(payload);
        // answers to refinements of the previous rows must not land here
        self.requests.invalidate(RequestFamily::Refinement);
        self.refine_positions.clear();
        self.bump();
        true
    }

    /// Describe the refinement call for rows still uncategorized, if ML is on
    /// and there are any.
    pub fn begin_refinement(&mut self) -> Option<RefineJob> {
        if !self.settings.use_ml {
            return None;
        }
        let predicted = self.predicted_rows()?;
        let rows = uncategorized_refine_rows(predicted);
        if rows.is_empty() {
            return None;
        }
        let positions = uncategorized_positions(predicted);
        self.refine_positions = positions.clone();
        Some(RefineJob {
            ticket: self.requests.issue(RequestFamily::Refinement),
            request: RefineRequest {
                rows,
                threshold: self.settings.refine_threshold,
            },
            positions,
        })
    }

    /// Merge a refinement answer into the rows it was requested for. Rows
    /// fixed by hand while the request was in flight keep the fix.
    pub fn complete_refinement(&mut self, ticket: Ticket, result: Result<Vec<Refinement>>) -> bool {
        if !self.requests.is_current(ticket) {
            warn!(token = ticket.token, "discarding stale refinement response");
            return false;
        }
        let refined = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("refinement failed: {e:#}");
                return false;
            }
        };
        let Some(rows) = self.predicted_rows() else {
            return false;
        };
        match merge_refinements_at(rows, &self.refine_positions, &refined) {
            Ok((merged, applied)) => {
                info!(refined = refined.len(), applied, "refined uncategorized rows");
                self.refine_positions.clear();
                self.replace_predictions(merged);
                true
            }
            Err(e) => {
                warn!("refinement not merged: {e:#}");
                false
            }
        }
    }

    /// Describe the savings-suggestion call for the current summary.
    /// `None` when no category has any transactions yet.
    pub fn begin_suggestions(&mut self) -> Option<SuggestionJob> {
        let categories: Vec<String> = self
            .source_summary()
            .iter()
            .filter(|s| s.transaction_count > 0 && !s.category.trim().is_empty())
            .take(self.settings.top_categories)
            .map(|s| s.category.clone())
            .collect();
        if categories.is_empty() {
            return None;
        }
        let merchants = match self.predicted_rows() {
            Some(rows) => self.tokenizer.extract(rows, self.settings.merchant_limit),
            None => self.tokenizer.extract(&self.entries, self.settings.merchant_limit),
        };
        Some(SuggestionJob {
            ticket: self.requests.issue(RequestFamily::Suggestions),
            query: SuggestionQuery {
                categories,
                merchants,
                max_items: self.settings.max_items,
            },
        })
    }

    /// Install suggestions; a failed fetch clears them.
    pub fn complete_suggestions(&mut self, ticket: Ticket, result: Result<Vec<SavingsItem>>) -> bool {
        if !self.requests.is_current(ticket) {
            debug!(token = ticket.token, "discarding stale savings suggestions");
            return false;
        }
        self.savings = match result {
            Ok(items) => items,
            Err(e) => {
                warn!("savings fetch failed: {e:#}");
                Vec::new()
            }
        };
        self.bump();
        true
    }

    fn replace_predictions(&mut self, rows: Vec<PredictedRow>) {
        let summary = summarize_rows(&rows);
        let server = self.server.get_or_insert_with(SummaryPayload::default);
        server.category_summary = summary;
        server.entries_with_pred = Some(rows);
        self.bump();
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

/// Rows of `rows` the user still has to look at.
pub fn count_uncategorized<R: LedgerRow>(rows: &[R]) -> usize {
    rows.iter().filter(|r| r.is_uncategorized()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterMode;
    use crate::model::{OTHER, UNCATEGORIZED};
    use anyhow::anyhow;

    fn pred(desc: &str, amount: f64, cat: &str) -> PredictedRow {
        PredictedRow {
            date: "2024-01-05".to_string(),
            description: desc.to_string(),
            amount,
            predicted_category: cat.to_string(),
            confidence: None,
        }
    }

    fn payload(rows: Vec<PredictedRow>) -> SummaryPayload {
        SummaryPayload {
            category_summary: summarize_rows(&rows),
            entries_with_pred: Some(rows),
            ..SummaryPayload::default()
        }
    }

    fn state() -> DashboardState {
        DashboardState::new(DashboardSettings::default()).unwrap()
    }

    fn entry(date: &str, desc: &str, amount: &str, cat: &str) -> ManualEntry {
        ManualEntry {
            date: date.to_string(),
            description: desc.to_string(),
            amount: amount.to_string(),
            category: cat.to_string(),
        }
    }

    #[test]
    fn test_manual_entry_updates_aggregate_and_order() {
        let mut s = state();
        s.add_manual_entry(entry("2024-01-05", "Coffee Shop", "-4.50", "Dining"))
            .unwrap();
        let rows = s
            .add_manual_entry(entry("2024-01-06", "Payroll", "2000.00", "Income"))
            .unwrap();
        assert_eq!(rows[0].description, "Payroll");
        assert_eq!(s.aggregate().get("Dining").unwrap().withdrawals, -4.5);
        assert_eq!(s.aggregate().get("Income").unwrap().deposits, 2000.0);
    }

    #[test]
    fn test_manual_entry_requires_fields() {
        let mut s = state();
        assert!(s.add_manual_entry(entry("", "Coffee", "-1", "Dining")).is_none());
        assert!(s.add_manual_entry(entry("2024-01-05", "Coffee", " ", "Dining")).is_none());
        assert!(s.entries().is_empty());
        assert_eq!(s.version(), 0);
    }

    #[test]
    fn test_effective_summary_falls_back_to_manual() {
        let mut s = state();
        s.add_manual_entry(entry("2024-01-05", "Coffee Shop", "-4.50", "Dining"));
        let summary = s.effective_summary();
        assert_eq!(summary[0].category, "Dining");
        assert!(summary.iter().any(|c| c.category == "Retail"));

        let t = s.begin_upload();
        s.apply_upload(t, payload(vec![pred("Coffee Shop", -4.5, "Food & Dining")]));
        assert_eq!(s.effective_summary()[0].category, "Food & Dining");
        assert_eq!(s.effective_summary().len(), 1);

        s.set_use_ml(false);
        assert_eq!(s.effective_summary()[0].category, "Dining");
    }

    #[test]
    fn test_effective_summary_collapses_to_other() {
        let mut s = state();
        let rows: Vec<_> = (0..12)
            .map(|i| pred(&format!("m{i}"), -(i as f64 + 1.0), &format!("C{i}")))
            .collect();
        let t = s.begin_upload();
        s.apply_upload(t, payload(rows));
        let summary = s.effective_summary();
        assert_eq!(summary.len(), 11);
        assert_eq!(summary[10].category, OTHER);
        assert_eq!(summary[10].transaction_count, 2);
    }

    #[test]
    fn test_refinement_round_trip() {
        let mut s = state();
        let t = s.begin_upload();
        s.apply_upload(
            t,
            payload(vec![pred("Coffee Shop", -4.5, UNCATEGORIZED), pred("Payroll", 2000.0, "Income")]),
        );
        let job = s.begin_refinement().unwrap();
        assert_eq!(job.request.rows.len(), 1);
        assert_eq!(job.request.threshold, 0.3);

        let refined = vec![Refinement {
            predicted_category: "Dining".to_string(),
            confidence: Some(0.6),
        }];
        assert!(s.complete_refinement(job.ticket, Ok(refined)));
        let rows = s.predicted_rows().unwrap();
        assert_eq!(rows[0].predicted_category, "Dining");
        assert_eq!(rows[0].confidence, Some(0.6));
        assert_eq!(rows[1].predicted_category, "Income");

        let server = s.server().unwrap();
        assert!(server.category_summary.iter().all(|c| c.category != UNCATEGORIZED));
        assert!(s.begin_refinement().is_none());
    }

    #[test]
    fn test_refinement_skipped_without_ml() {
        let mut s = state();
        s.set_use_ml(false);
        let t = s.begin_upload();
        s.apply_upload(t, payload(vec![pred("Coffee Shop", -4.5, UNCATEGORIZED)]));
        assert!(s.begin_refinement().is_none());
    }

    #[test]
    fn test_refinement_failure_leaves_predictions() {
        let mut s = state();
        let t = s.begin_upload();
        s.apply_upload(t, payload(vec![pred("Coffee Shop", -4.5, UNCATEGORIZED)]));
        let job = s.begin_refinement().unwrap();
        assert!(!s.complete_refinement(job.ticket, Err(anyhow!("connection refused"))));
        assert!(s.predicted_rows().unwrap()[0].is_uncategorized());
    }

    #[test]
    fn test_stale_upload_dropped() {
        let mut s = state();
        let first = s.begin_upload();
        let second = s.begin_upload();
        assert!(s.apply_upload(second, payload(vec![pred("New", -1.0, "Fees")])));
        assert!(!s.apply_upload(first, payload(vec![pred("Old", -1.0, "Fees")])));
        assert_eq!(s.predicted_rows().unwrap()[0].description, "New");
    }

    #[test]
    fn test_stale_suggestions_do_not_overwrite() {
        let mut s = state();
        s.add_manual_entry(entry("2024-01-05", "Starbucks", "-4.50", "Dining"));
        let old = s.begin_suggestions().unwrap();
        let new = s.begin_suggestions().unwrap();

        let item = |t: &str| SavingsItem {
            source: "deals".to_string(),
            title: t.to_string(),
            link: "https://example.com".to_string(),
        };
        assert!(s.complete_suggestions(new.ticket, Ok(vec![item("fresh")])));
        assert!(!s.complete_suggestions(old.ticket, Ok(vec![item("stale")])));
        assert_eq!(s.savings()[0].title, "fresh");

        let newest = s.begin_suggestions().unwrap();
        assert!(s.complete_suggestions(newest.ticket, Err(anyhow!("timeout"))));
        assert!(s.savings().is_empty());
    }

    #[test]
    fn test_suggestion_query_shape() {
        let mut s = state();
        s.add_manual_entry(entry("2024-01-05", "Starbucks Seattle", "-40", "Dining"));
        s.add_manual_entry(entry("2024-01-06", "Starbucks", "-4", "Dining"));
        let job = s.begin_suggestions().unwrap();
        assert_eq!(job.query.categories, vec!["Dining"]);
        assert_eq!(job.query.merchants[0], "starbucks");
        assert_eq!(job.query.max_items, 12);
    }

    #[test]
    fn test_suggestion_categories_skip_empty_and_follow_list_order() {
        let mut s = state();
        assert!(s.begin_suggestions().is_none());

        let rows: Vec<_> = ["Rent", "Fees", "Dining", "Travel", "Gym", "Books", "Music"]
            .iter()
            .map(|c| pred(c, -10.0, c))
            .collect();
        let mut body = payload(rows);
        body.category_summary.insert(1, CategorySummary::empty("Retail"));
        let t = s.begin_upload();
        s.apply_upload(t, body);

        let job = s.begin_suggestions().unwrap();
        assert_eq!(job.query.categories, vec!["Rent", "Fees", "Dining", "Travel", "Gym"]);
    }

    #[test]
    fn test_fix_during_refinement_keeps_other_answers() {
        let mut s = state();
        let t = s.begin_upload();
        s.apply_upload(
            t,
            payload(vec![pred("Gym", -30.0, UNCATEGORIZED), pred("Airline", -250.0, UNCATEGORIZED)]),
        );
        let job = s.begin_refinement().unwrap();
        assert_eq!(job.positions, vec![0, 1]);

        s.fix_category(0, "Fees").unwrap();
        let refined = vec![
            Refinement {
                predicted_category: "Health".to_string(),
                confidence: Some(0.5),
            },
            Refinement {
                predicted_category: "Travel".to_string(),
                confidence: Some(0.8),
            },
        ];
        assert!(s.complete_refinement(job.ticket, Ok(refined)));

        let rows = s.predicted_rows().unwrap();
        assert_eq!(rows[0].predicted_category, "Fees");
        assert_eq!(rows[0].confidence, Some(1.0));
        assert_eq!(rows[1].predicted_category, "Travel");
        assert!(s.review_queue().is_empty());
    }

    #[test]
    fn test_new_upload_drops_pending_refinement() {
        let mut s = state();
        let t = s.begin_upload();
        s.apply_upload(t, payload(vec![pred("Gym", -30.0, UNCATEGORIZED)]));
        let job = s.begin_refinement().unwrap();

        s.set_use_ml(false);
        let t = s.begin_upload();
        s.apply_upload(t, payload(vec![pred("Bakery", -6.0, UNCATEGORIZED)]));
        assert!(s.begin_refinement().is_none());

        let refined = vec![Refinement {
            predicted_category: "Health".to_string(),
            confidence: Some(0.5),
        }];
        assert!(!s.complete_refinement(job.ticket, Ok(refined)));
        assert!(s.predicted_rows().unwrap()[0].is_uncategorized());
    }

    #[test]
    fn test_fix_recomputes_summary() {
        let mut s = state();
        assert!(s.fix_category(0, "Dining").is_none());

        let t = s.begin_upload();
        s.apply_upload(
            t,
            payload(vec![pred("Coffee Shop", -4.5, UNCATEGORIZED), pred("Payroll", 2000.0, "Income")]),
        );
        let sample = s.fix_category(0, "Dining").unwrap();
        assert_eq!(sample.description, "Coffee Shop");
        assert_eq!(sample.correct_category, "Dining");

        let rows = s.predicted_rows().unwrap();
        assert_eq!(rows[0].confidence, Some(1.0));
        let summary = &s.server().unwrap().category_summary;
        assert!(summary.iter().any(|c| c.category == "Dining" && c.transaction_count == 1));
        assert!(summary.iter().all(|c| c.category != UNCATEGORIZED));
        assert!(s.fix_category(9, "Dining").is_none());
    }

    #[test]
    fn test_filtered_views_follow_selection() {
        let mut s = state();
        s.ingest_rows(vec![
            TransactionRow::new("2024-01-05", "Coffee Shop", -4.5, Some("Dining")),
            TransactionRow::new("2024-01-06", "Payroll", 2000.0, Some("Income")),
        ]);
        assert_eq!(s.filtered_rows().len(), 1);

        s.click_category(Some("dining out"));
        assert_eq!(s.filter().mode, FilterMode::Category);
        assert_eq!(s.filter().selected_category.as_deref(), Some("Dining"));
        let summary = s.filtered_summary();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].category, "Dining - Spending");

        s.click_category(None);
        s.set_show_spending(false);
        let rows = s.filtered_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description, "Payroll");
    }

    #[test]
    fn test_review_queue_and_counts() {
        let mut s = state();
        let t = s.begin_upload();
        s.apply_upload(
            t,
            payload(vec![pred("Small", -3.0, UNCATEGORIZED), pred("Big", -300.0, UNCATEGORIZED)]),
        );
        let queue = s.review_queue();
        assert_eq!(queue[0].index, 1);
        assert_eq!(count_uncategorized(s.predicted_rows().unwrap()), 2);
    }

    #[test]
    fn test_labels_replaced_only_when_present() {
        let mut s = state();
        assert_eq!(s.labels().len(), 15);
        s.set_labels(Vec::new());
        assert_eq!(s.labels().len(), 15);
        s.set_labels(vec!["Dining".to_string()]);
        assert_eq!(s.labels().to_vec(), vec!["Dining".to_string()]);
    }
}
