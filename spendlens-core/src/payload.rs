//! Response bodies produced by the categorization and savings backend.

use serde::{Deserialize, Serialize};

use crate::model::{CategorySummary, FeedbackSample, PredictedRow, RefineRow};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstWordSummary {
    #[serde(rename = "FirstWord")]
    pub first_word: String,
    #[serde(rename = "TotalDeposits", default, skip_serializing_if = "Option::is_none")]
    pub total_deposits: Option<f64>,
    #[serde(rename = "TotalWithdrawals", default, skip_serializing_if = "Option::is_none")]
    pub total_withdrawals: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositCluster {
    #[serde(rename = "Cluster_Label")]
    pub cluster_label: String,
    #[serde(rename = "TotalDeposits")]
    pub total_deposits: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalCluster {
    #[serde(rename = "Cluster_Label")]
    pub cluster_label: String,
    #[serde(rename = "TotalWithdrawals")]
    pub total_withdrawals: f64,
}

/// Body of `/upload-csv`. The backend may return only a subset of these,
/// so every field defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryPayload {
    pub total_deposits: f64,
    pub total_withdrawals: f64,
    pub num_deposits: u64,
    pub num_withdrawals: u64,
    pub deposits_grouped_by_first_word: Vec<FirstWordSummary>,
    pub withdrawals_grouped_by_first_word: Vec<FirstWordSummary>,
    pub deposits_grouped_by_cluster: Vec<DepositCluster>,
    pub withdrawals_grouped_by_cluster: Vec<WithdrawalCluster>,
    pub category_summary: Vec<CategorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries_with_pred: Option<Vec<PredictedRow>>,
}

impl SummaryPayload {
    /// Predicted rows, when the backend returned any list at all (possibly empty).
    pub fn predicted_rows(&self) -> Option<&[PredictedRow]> {
        self.entries_with_pred.as_deref()
    }
}

/// One merchant-substitution suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsItem {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
}

/// Body of `/nlp/refine`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub rows: Vec<RefineRow>,
    pub threshold: f64,
}

/// Body of `/nlp/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRequest {
    pub samples: Vec<FeedbackSample>,
}

/// Body of `/savings/suggestions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionQuery {
    pub categories: Vec<String>,
    pub merchants: Vec<String>,
    pub max_items: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_upload_body_decodes() {
        let json = r#"{
            "category_summary": [
                {"Category":"Dining","TransactionCount":2,"TotalAmount":-9.0,"Withdrawals":-9.0,"Deposits":0}
            ],
            "entries_with_pred": [
                {"Date":"2024-01-05","Description":"Coffee Shop","Amount":-4.5,"PredictedCategory":"Dining","Confidence":0.92}
            ]
        }"#;
        let payload: SummaryPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.total_deposits, 0.0);
        assert_eq!(payload.category_summary.len(), 1);
        assert_eq!(payload.category_summary[0].transaction_count, 2);
        let rows = payload.predicted_rows().unwrap();
        assert_eq!(rows[0].confidence, Some(0.92));
    }

    #[test]
    fn test_missing_predictions_is_none() {
        let payload: SummaryPayload = serde_json::from_str(r#"{"category_summary":[]}"#).unwrap();
        assert!(payload.predicted_rows().is_none());
    }
}
