//! Savings-analysis report returned by `/savings/analyze`.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsAnalysis {
    pub spending_analysis: SpendingAnalysis,
    pub savings_report: SavingsReport,
    pub comprehensive_savings: ComprehensiveSavings,
    pub total_potential_savings: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpendingAnalysis {
    /// Shape varies by backend version; kept as raw JSON.
    pub top_categories: Map<String, Value>,
    pub merchant_analysis: Vec<MerchantSpend>,
    pub total_expenses: f64,
    pub avg_transaction: f64,
    pub total_transactions: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantSpend {
    pub merchant: String,
    pub total_spent: f64,
    pub transaction_count: u64,
    pub avg_amount: f64,
    pub sample_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alternative {
    pub alternative: String,
    pub estimated_savings: f64,
    pub savings_percentage: f64,
    pub reason: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsOpportunity {
    pub category: Option<String>,
    pub merchant: Option<String>,
    pub current_spending: f64,
    pub transaction_count: u64,
    pub alternatives: Vec<Alternative>,
    pub potential_savings: f64,
}

impl SavingsOpportunity {
    pub fn label(&self) -> &str {
        self.merchant
            .as_deref()
            .or(self.category.as_deref())
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedRecommendation {
    pub merchant: String,
    pub current_spending: f64,
    pub transaction_count: u64,
    pub avg_per_visit: f64,
    pub alternatives: Vec<String>,
    pub potential_savings: f64,
    pub savings_percentage: f64,
    pub reasoning: String,
    pub specific_suggestion: String,
    pub sample_descriptions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSummary {
    pub total_expenses: f64,
    pub total_potential_savings: f64,
    pub savings_percentage: f64,
    pub opportunities_count: u64,
    pub detailed_recommendations_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavingsReport {
    pub total_potential_savings: f64,
    pub savings_opportunities: Vec<SavingsOpportunity>,
    pub detailed_recommendations: Vec<DetailedRecommendation>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComprehensiveSavings {
    pub total_potential_savings: f64,
    pub savings_breakdown: Vec<SavingsOpportunity>,
    pub deals_found: Vec<Value>,
    pub recommendations: Vec<String>,
}

/// Decode an analyze response. The backend reports failures as a 200 with
/// an `{"error": ...}` body.
pub fn parse_analysis(body: Value) -> Result<SavingsAnalysis> {
    if let Some(err) = body.get("error").and_then(Value::as_str) {
        bail!("savings analysis failed: {err}");
    }
    serde_json::from_value(body).context("parse savings analysis")
}
