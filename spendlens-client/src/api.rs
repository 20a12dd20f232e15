use anyhow::{Context, Result, bail};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use spendlens_core::{
    FeedbackRequest, RefineRequest, Refinement, SavingsItem, SuggestionQuery, SummaryPayload,
    TransactionRow,
};
use std::time::Duration;
use tracing::debug;

use crate::analysis::{SavingsAnalysis, parse_analysis};
use crate::backend::Backend;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5050";

/// JSON-over-HTTP client for the categorization/savings backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Deserialize)]
struct LabelsResp {
    #[serde(default)]
    labels: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct SuggestionsResp {
    #[serde(default)]
    items: Option<Vec<SavingsItem>>,
}

#[derive(Deserialize)]
struct HealthResp {
    #[serde(default)]
    status: String,
}

#[derive(Serialize)]
struct AnalyzeReq {
    transactions: Vec<TransactionRow>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    pub async fn health(&self) -> Result<String> {
        let resp = self
            .http
            .get(self.url("/health"))
            .send()
            .await
            .context("health request")?;
        let out: HealthResp = read_json(resp, "health").await?;
        Ok(out.status)
    }

    async fn post_json<B, R>(&self, path: &str, body: &B, what: &str) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let resp = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("{what} request"))?;
        read_json(resp, what).await
    }
}

async fn read_json<R: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<R> {
    let status = resp.status();
    if !status.is_success() {
        let txt = resp.text().await.unwrap_or_default();
        bail!("{what} error: {status} {txt}");
    }
    resp.json().await.with_context(|| format!("parse {what} response"))
}

impl Backend for ApiClient {
    async fn labels(&self) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(self.url("/nlp/labels"))
            .send()
            .await
            .context("labels request")?;
        let out: LabelsResp = read_json(resp, "labels").await?;
        Ok(out.labels.unwrap_or_default())
    }

    async fn upload_csv(&self, file_name: String, bytes: Vec<u8>) -> Result<SummaryPayload> {
        debug!(file_name = %file_name, bytes = bytes.len(), "uploading csv");
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")
            .context("csv mime type")?;
        let form = Form::new().part("file", part);
        let resp = self
            .http
            .post(self.url("/upload-csv"))
            .multipart(form)
            .send()
            .await
            .context("upload request")?;
        read_json(resp, "upload").await
    }

    async fn refine(&self, request: RefineRequest) -> Result<Vec<Refinement>> {
        self.post_json("/nlp/refine", &request, "refine").await
    }

    async fn feedback(&self, request: FeedbackRequest) -> Result<()> {
        let resp = self
            .http
            .post(self.url("/nlp/feedback"))
            .json(&request)
            .send()
            .await
            .context("feedback request")?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            bail!("feedback error: {status} {txt}");
        }
        Ok(())
    }

    async fn suggestions(&self, query: SuggestionQuery) -> Result<Vec<SavingsItem>> {
        let out: SuggestionsResp = self
            .post_json("/savings/suggestions", &query, "suggestions")
            .await?;
        Ok(out.items.unwrap_or_default())
    }

    async fn analyze(&self, transactions: Vec<TransactionRow>) -> Result<SavingsAnalysis> {
        let body: Value = self
            .post_json("/savings/analyze", &AnalyzeReq { transactions }, "analyze")
            .await?;
        parse_analysis(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new("http://localhost:5050/", Duration::from_secs(5)).unwrap();
        assert_eq!(api.url("/nlp/refine"), "http://localhost:5050/nlp/refine");
        assert_eq!(api.url("health"), "http://localhost:5050/health");
    }

    #[test]
    fn test_analyze_body_omits_category() {
        let body = AnalyzeReq {
            transactions: vec![TransactionRow::new("2024-01-05", "Coffee", -4.5, None)],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"transactions": [{"Date": "2024-01-05", "Description": "Coffee", "Amount": -4.5}]})
        );
    }

    #[test]
    fn test_non_array_labels_become_empty() {
        let out: LabelsResp = serde_json::from_str(r#"{"labels": null}"#).unwrap();
        assert!(out.labels.unwrap_or_default().is_empty());
    }
}
