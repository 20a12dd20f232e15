//! Entry aggregation: running per-category totals and the chart reducers.

use std::collections::HashMap;

use crate::model::{CategorySummary, DEFAULT_CATEGORIES, LedgerRow, OTHER};

/// Running category aggregate for manually entered and uploaded rows.
///
/// Categories keep the order in which they were first seen.
#[derive(Debug, Clone, Default)]
pub struct CategoryAggregate {
    summaries: Vec<CategorySummary>,
    index: HashMap<String, usize>,
    version: u64,
}

impl CategoryAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one row into its category.
    pub fn add_row(&mut self, row: &impl LedgerRow) {
        let category = row.category();
        let slot = match self.index.get(category) {
            Some(&i) => i,
            None => {
                self.summaries.push(CategorySummary::empty(category));
                self.index.insert(category.to_string(), self.summaries.len() - 1);
                self.summaries.len() - 1
            }
        };
        self.summaries[slot].record(row.amount());
        self.version += 1;
    }

    pub fn extend<'a, R: LedgerRow + 'a>(&mut self, rows: impl IntoIterator<Item = &'a R>) {
        for row in rows {
            self.add_row(row);
        }
    }

    pub fn get(&self, category: &str) -> Option<&CategorySummary> {
        self.index.get(category).map(|&i| &self.summaries[i])
    }

    /// Number of rows folded in so far; bumps on every add.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn summaries(&self) -> &[CategorySummary] {
        &self.summaries
    }

    /// Current summaries padded with the default category set.
    pub fn to_list(&self) -> Vec<CategorySummary> {
        with_default_categories(self.summaries.clone())
    }
}

/// Append zero-valued entries for every default category not already present.
pub fn with_default_categories(mut list: Vec<CategorySummary>) -> Vec<CategorySummary> {
    for cat in DEFAULT_CATEGORIES {
        if !list.iter().any(|s| s.category == cat) {
            list.push(CategorySummary::empty(cat));
        }
    }
    list
}

/// Keep the `n` largest categories by absolute total and fold the rest into
/// a synthetic "Other" bucket.
pub fn top_n_plus_other(items: &[CategorySummary], n: usize) -> Vec<CategorySummary> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| b.total_amount.abs().total_cmp(&a.total_amount.abs()));
    if sorted.len() <= n {
        return sorted;
    }

    let rest = sorted.split_off(n);
    let mut other = CategorySummary::empty(OTHER);
    for r in &rest {
        other.transaction_count += r.transaction_count;
        other.total_amount += r.total_amount;
        other.withdrawals += r.withdrawals;
        other.deposits += r.deposits;
    }
    sorted.push(other);
    sorted
}

/// Recompute a category summary from scratch over a row set.
pub fn summarize_rows<R: LedgerRow>(rows: &[R]) -> Vec<CategorySummary> {
    let mut agg = CategoryAggregate::new();
    agg.extend(rows);
    agg.summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionRow;

    fn summary(cat: &str, count: usize, w: f64, d: f64) -> CategorySummary {
        CategorySummary {
            category: cat.to_string(),
            transaction_count: count,
            total_amount: w + d,
            withdrawals: w,
            deposits: d,
        }
    }

    #[test]
    fn test_aggregate_two_rows() {
        let rows = vec![
            TransactionRow::new("2024-01-05", "Coffee Shop", -4.50, Some("Dining")),
            TransactionRow::new("2024-01-06", "Payroll", 2000.00, Some("Income")),
        ];
        let mut agg = CategoryAggregate::new();
        agg.extend(&rows);

        let dining = agg.get("Dining").unwrap();
        assert_eq!(dining.transaction_count, 1);
        assert_eq!(dining.total_amount, -4.5);
        assert_eq!(dining.withdrawals, -4.5);
        assert_eq!(dining.deposits, 0.0);

        let income = agg.get("Income").unwrap();
        assert_eq!(income.transaction_count, 1);
        assert_eq!(income.total_amount, 2000.0);
        assert_eq!(income.withdrawals, 0.0);
        assert_eq!(income.deposits, 2000.0);
        assert_eq!(agg.version(), 2);
    }

    #[test]
    fn test_missing_and_blank_category_is_uncategorized() {
        let mut agg = CategoryAggregate::new();
        agg.add_row(&TransactionRow::new("2024-01-05", "A", -1.0, None));
        agg.add_row(&TransactionRow::new("2024-01-05", "B", -2.0, Some("  ")));
        agg.add_row(&TransactionRow::new("2024-01-05", "C", 3.0, Some(" Dining ")));

        assert_eq!(agg.get("Uncategorized").unwrap().transaction_count, 2);
        assert_eq!(agg.get("Dining").unwrap().transaction_count, 1);
    }

    #[test]
    fn test_totals_match_parts_for_every_category() {
        let amounts = [-3.0, 12.5, -0.25, 0.0, 40.0, -19.99];
        let cats = ["A", "B", "A", "C", "B", "A"];
        let mut agg = CategoryAggregate::new();
        for (amt, cat) in amounts.iter().zip(cats) {
            agg.add_row(&TransactionRow::new("2024-02-01", "x", *amt, Some(cat)));
        }
        for s in agg.summaries() {
            assert!((s.total_amount - (s.withdrawals + s.deposits)).abs() < 1e-9);
            let expected = cats.iter().filter(|c| **c == s.category).count();
            assert_eq!(s.transaction_count, expected);
        }
    }

    #[test]
    fn test_to_list_pads_defaults() {
        let mut agg = CategoryAggregate::new();
        agg.add_row(&TransactionRow::new("2024-01-05", "Zara", -60.0, Some("Retail")));
        let list = agg.to_list();
        assert_eq!(list.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(list[0].category, "Retail");
        assert_eq!(list[0].transaction_count, 1);
        assert!(list.iter().filter(|s| s.category != "Retail").all(|s| s.transaction_count == 0));
    }

    #[test]
    fn test_top_n_plus_other_sums_tail() {
        let items = vec![
            summary("A", 1, -5.0, 0.0),
            summary("B", 2, -100.0, 10.0),
            summary("C", 3, 0.0, 50.0),
            summary("D", 4, -1.0, 2.0),
            summary("E", 5, -30.0, 0.0),
        ];
        let out = top_n_plus_other(&items, 2);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].category, "B");
        assert_eq!(out[1].category, "C");

        let other = &out[2];
        assert_eq!(other.category, OTHER);
        assert_eq!(other.transaction_count, 1 + 4 + 5);
        assert_eq!(other.total_amount, -5.0 + 1.0 - 30.0);
        assert_eq!(other.withdrawals, -5.0 - 1.0 - 30.0);
        assert_eq!(other.deposits, 2.0);
    }

    #[test]
    fn test_top_n_without_overflow_only_sorts() {
        let items = vec![summary("A", 1, -5.0, 0.0), summary("B", 1, -50.0, 0.0)];
        let out = top_n_plus_other(&items, 10);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, "B");
        assert!(out.iter().all(|s| s.category != OTHER));
    }
}
