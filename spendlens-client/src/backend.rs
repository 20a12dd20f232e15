use anyhow::Result;
use spendlens_core::{
    FeedbackRequest, RefineRequest, Refinement, SavingsItem, SuggestionQuery, SummaryPayload,
    TransactionRow,
};
use std::future::Future;

use crate::analysis::SavingsAnalysis;

/// The remote categorization and savings service.
///
/// [`crate::ApiClient`] talks HTTP; tests substitute an in-memory fake.
/// Arguments are owned so calls can be moved into spawned tasks.
pub trait Backend: Clone + Send + Sync + 'static {
    /// Category label set offered for manual fixes.
    fn labels(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    fn upload_csv(
        &self,
        file_name: String,
        bytes: Vec<u8>,
    ) -> impl Future<Output = Result<SummaryPayload>> + Send;

    /// Answers are positionally aligned with `request.rows`.
    fn refine(&self, request: RefineRequest) -> impl Future<Output = Result<Vec<Refinement>>> + Send;

    fn feedback(&self, request: FeedbackRequest) -> impl Future<Output = Result<()>> + Send;

    fn suggestions(
        &self,
        query: SuggestionQuery,
    ) -> impl Future<Output = Result<Vec<SavingsItem>>> + Send;

    fn analyze(
        &self,
        transactions: Vec<TransactionRow>,
    ) -> impl Future<Output = Result<SavingsAnalysis>> + Send;
}
