//! Prediction reconciliation: splice refinement answers into predicted rows,
//! apply manual fixes, and build the review queue of uncategorized rows.

use anyhow::{Result, bail};

use crate::model::{FeedbackSample, LedgerRow, PredictedRow, RefineRow, Refinement};

/// Minimum confidence the refiner must reach before it labels a row.
pub const REFINE_THRESHOLD: f64 = 0.3;

/// The (description, amount) of every uncategorized row, in row order.
pub fn uncategorized_refine_rows(rows: &[PredictedRow]) -> Vec<RefineRow> {
    rows.iter()
        .filter(|r| r.is_uncategorized())
        .map(|r| RefineRow {
            description: r.description.clone(),
            amount: r.amount,
        })
        .collect()
}

/// Positions of the uncategorized rows, in row order.
pub fn uncategorized_positions(rows: &[PredictedRow]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter(|(_, r)| r.is_uncategorized())
        .map(|(i, _)| i)
        .collect()
}

/// Merge refinement answers back into `rows`.
///
/// The refiner answers positionally: the k-th answer belongs to the k-th
/// uncategorized row. Rows carry no id to re-align by, so a response of the
/// wrong length is rejected outright.
pub fn merge_refinements(rows: &[PredictedRow], refined: &[Refinement]) -> Result<Vec<PredictedRow>> {
    let positions = uncategorized_positions(rows);
    if positions.len() != refined.len() {
        bail!(
            "refinement returned {} predictions for {} uncategorized rows",
            refined.len(),
            positions.len()
        );
    }
    Ok(merge_refinements_at(rows, &positions, refined)?.0)
}

/// Splice `refined[k]` into `rows[positions[k]]`, where `positions` are the
/// rows the refinement was requested for.
///
/// Rows that are no longer uncategorized (fixed by hand in the meantime) or
/// out of range keep their value. Returns the merged rows and the number of
/// answers applied.
pub fn merge_refinements_at(
    rows: &[PredictedRow],
    positions: &[usize],
    refined: &[Refinement],
) -> Result<(Vec<PredictedRow>, usize)> {
    if positions.len() != refined.len() {
        bail!(
            "refinement returned {} predictions for {} requested rows",
            refined.len(),
            positions.len()
        );
    }

    let mut merged = rows.to_vec();
    let mut applied = 0;
    for (&pos, upd) in positions.iter().zip(refined) {
        let Some(row) = merged.get_mut(pos) else {
            continue;
        };
        if !row.is_uncategorized() {
            continue;
        }
        row.predicted_category = upd.predicted_category.clone();
        row.confidence = upd.confidence;
        applied += 1;
    }
    Ok((merged, applied))
}

/// Result of a manual correction.
#[derive(Debug, Clone, PartialEq)]
pub struct Fix {
    pub rows: Vec<PredictedRow>,
    pub feedback: FeedbackSample,
}

/// Set row `index` to `category` with full confidence.
///
/// Returns `None` when the index is out of range.
pub fn apply_fix(rows: &[PredictedRow], index: usize, category: &str) -> Option<Fix> {
    let target = rows.get(index)?;
    let feedback = FeedbackSample {
        description: target.description.clone(),
        amount: target.amount,
        correct_category: category.to_string(),
    };

    let mut rows = rows.to_vec();
    rows[index].predicted_category = category.to_string();
    rows[index].confidence = Some(1.0);
    Some(Fix { rows, feedback })
}

/// An uncategorized row queued for manual review.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    /// Position in the full predicted list; this is what [`apply_fix`] takes.
    pub index: usize,
    pub row: PredictedRow,
}

/// Uncategorized rows, largest absolute amount first.
pub fn uncategorized_for_review(rows: &[PredictedRow]) -> Vec<ReviewItem> {
    let mut items: Vec<ReviewItem> = rows
        .iter()
        .filter(|r| r.is_uncategorized())
        .map(|r| ReviewItem {
            // first structural match, so duplicate rows share an index
            index: rows.iter().position(|o| o.same_transaction(r)).unwrap_or_default(),
            row: r.clone(),
        })
        .collect();
    items.sort_by(|a, b| b.row.amount.abs().total_cmp(&a.row.amount.abs()));
    items
}
