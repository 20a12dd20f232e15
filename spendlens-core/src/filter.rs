//! Filter engine: derives the transaction list and the category summary
//! shown to the user from the current selection state.

use serde::{Deserialize, Serialize};

use crate::model::{CategorySummary, LedgerRow, PredictedRow, TransactionRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Spending,
    Earning,
    Category,
}

/// Selection state behind every filtered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_category: Option<String>,
    pub mode: FilterMode,
    /// Spending/earning toggle applied in `All` mode. `true` shows spending.
    pub show_spending: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_category: None,
            mode: FilterMode::All,
            show_spending: true,
        }
    }
}

impl FilterState {
    pub fn select_spending(&mut self) {
        self.mode = FilterMode::Spending;
        self.selected_category = None;
    }

    pub fn select_earning(&mut self) {
        self.mode = FilterMode::Earning;
        self.selected_category = None;
    }

    pub fn set_show_spending(&mut self, show_spending: bool) {
        self.show_spending = show_spending;
    }

    /// Select a category (resolving it against `known` first) or clear the
    /// selection with `None`. Selecting always switches to `Category` mode,
    /// including when the name was resolved by word overlap.
    pub fn click_category<S: AsRef<str>>(&mut self, category: Option<&str>, known: &[S]) {
        match category {
            Some(requested) => {
                let chosen = resolve_category_alias(requested, known)
                    .unwrap_or_else(|| requested.to_string());
                self.selected_category = Some(chosen);
                self.mode = FilterMode::Category;
            }
            None => {
                self.selected_category = None;
                self.mode = FilterMode::All;
            }
        }
    }

    /// Narrow `base` according to the current selection.
    pub fn filter_rows(&self, base: Vec<TransactionRow>) -> Vec<TransactionRow> {
        let no_selection = self.selected_category.is_none();
        let mut rows = match self.mode {
            FilterMode::Spending if no_selection => keep(base, |r| r.is_spending()),
            FilterMode::Earning if no_selection => keep(base, |r| r.is_earning()),
            FilterMode::All if no_selection => {
                if self.show_spending {
                    keep(base, |r| r.is_spending())
                } else {
                    keep(base, |r| r.is_earning())
                }
            }
            _ => base,
        };

        if let (FilterMode::Category, Some(selected)) = (self.mode, &self.selected_category) {
            rows.retain(|r| r.category() == selected.as_str());
        }
        rows
    }

    /// Summary view: the effective summary as-is, or the spending/earning
    /// split of the selected category.
    pub fn filter_summary(&self, effective: &[CategorySummary]) -> Vec<CategorySummary> {
        match &self.selected_category {
            None => effective.to_vec(),
            Some(selected) => match find_summary(effective, selected) {
                Some(summary) => category_breakdown(summary),
                None => Vec::new(),
            },
        }
    }
}

fn keep(rows: Vec<TransactionRow>, pred: impl Fn(&TransactionRow) -> bool) -> Vec<TransactionRow> {
    rows.into_iter().filter(|r| pred(r)).collect()
}

/// Rows the filters start from: backend predictions when present, else local rows.
pub fn base_rows(predicted: Option<&[PredictedRow]>, local: &[TransactionRow]) -> Vec<TransactionRow> {
    match predicted {
        Some(rows) => rows.iter().map(PredictedRow::to_transaction).collect(),
        None => local.to_vec(),
    }
}

/// Look up `selected` in the summary list: exact name, then
/// case-insensitive, then containment in either direction.
fn find_summary<'a>(summaries: &'a [CategorySummary], selected: &str) -> Option<&'a CategorySummary> {
    let wanted = selected.to_lowercase();
    summaries
        .iter()
        .find(|s| s.category.trim() == selected)
        .or_else(|| summaries.iter().find(|s| s.category.trim().to_lowercase() == wanted))
        .or_else(|| {
            summaries.iter().find(|s| {
                let have = s.category.trim().to_lowercase();
                have.contains(&wanted) || wanted.contains(&have)
            })
        })
}

/// Split one category into synthetic "- Spending" / "- Earning" rows.
///
/// Counts are estimated as `floor(count * side / |total|)`. The estimate is
/// lossy: sides may undercount, and for mixed-sign categories (where
/// `|total|` is smaller than either side) overcount. A zero total gives 0.
pub fn category_breakdown(summary: &CategorySummary) -> Vec<CategorySummary> {
    let spent = summary.withdrawals.abs();
    let earned = summary.deposits;
    let total = summary.total_amount.abs();
    let estimate = |side: f64| -> usize {
        if side > 0.0 && total > 0.0 {
            (summary.transaction_count as f64 * side / total).floor() as usize
        } else {
            0
        }
    };

    let mut out = Vec::new();
    if spent != 0.0 {
        out.push(CategorySummary {
            category: format!("{} - Spending", summary.category),
            transaction_count: estimate(spent),
            total_amount: spent,
            withdrawals: summary.withdrawals,
            deposits: 0.0,
        });
    }
    if earned != 0.0 {
        out.push(CategorySummary {
            category: format!("{} - Earning", summary.category),
            transaction_count: estimate(earned),
            total_amount: earned,
            withdrawals: 0.0,
            deposits: earned,
        });
    }
    out
}

fn category_words(s: &str) -> Vec<String> {
    s.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '&' || c == ',')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map a requested category name onto one of the `known` categories.
///
/// An exact match wins; otherwise the first known category sharing a word
/// with the request (one word containing the other) is returned.
pub fn resolve_category_alias<S: AsRef<str>>(requested: &str, known: &[S]) -> Option<String> {
    if let Some(hit) = known.iter().find(|k| k.as_ref() == requested) {
        return Some(hit.as_ref().to_string());
    }

    let wanted = category_words(requested);
    if wanted.is_empty() {
        return None;
    }
    known
        .iter()
        .find(|k| {
            category_words(k.as_ref())
                .iter()
                .any(|have| wanted.iter().any(|w| have.contains(w.as_str()) || w.contains(have.as_str())))
        })
        .map(|k| k.as_ref().to_string())
}

/// Distinct resolved categories of `rows`, in first-seen order.
pub fn known_categories<R: LedgerRow>(rows: &[R]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for r in rows {
        let c = r.category();
        if !out.iter().any(|k| k == c) {
            out.push(c.to_string());
        }
    }
    out
}
