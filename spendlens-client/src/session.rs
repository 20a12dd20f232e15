//! The dashboard session: sole owner of [`DashboardState`].
//!
//! Uploads are awaited in place. Refinement, suggestion and feedback calls
//! are spawned; their results come back as [`Completion`] events on one
//! channel and are applied in arrival order by [`Session::next_completion`].
//! Stale completions are dropped by the state's request tickets.

use anyhow::Result;
use spendlens_core::{
    DashboardSettings, DashboardState, FeedbackRequest, ManualEntry, RefineJob, Refinement,
    SavingsItem, Ticket,
};
use spendlens_ingest::{COMBINED_FILE_NAME, combined_csv, parse_statement};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::analysis::SavingsAnalysis;
use crate::backend::Backend;

#[derive(Debug)]
pub enum Completion {
    Refinement {
        ticket: Ticket,
        result: Result<Vec<Refinement>>,
    },
    Suggestions {
        ticket: Ticket,
        result: Result<Vec<SavingsItem>>,
    },
    Feedback {
        result: Result<()>,
    },
}

pub struct Session<B: Backend> {
    backend: B,
    state: DashboardState,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<B: Backend> Session<B> {
    pub fn new(backend: B, settings: DashboardSettings) -> Result<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            backend,
            state: DashboardState::new(settings)?,
            tx,
            rx,
            in_flight: 0,
        })
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Local-only mutations (filters, toggles) go straight to the state.
    pub fn state_mut(&mut self) -> &mut DashboardState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Spawned requests whose completion has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Fetch the label set; on failure the current labels stay.
    pub async fn load_labels(&mut self) {
        match self.backend.labels().await {
            Ok(labels) => self.state.set_labels(labels),
            Err(e) => debug!("labels unavailable, keeping defaults: {e:#}"),
        }
    }

    /// Upload a statement file. The backend's predictions replace the server
    /// view, the file's rows join the local rows, then refinement or a
    /// savings request follows. Returns `false` when the upload failed; the
    /// state is untouched in that case.
    pub async fn upload_csv(&mut self, file_name: &str, bytes: Vec<u8>) -> bool {
        let ticket = self.state.begin_upload();
        let payload = match self.backend.upload_csv(file_name.to_string(), bytes.clone()).await {
            Ok(p) => p,
            Err(e) => {
                error!("upload failed: {e:#}");
                return false;
            }
        };
        if !self.state.apply_upload(ticket, payload) {
            return false;
        }

        match parse_statement(bytes.as_slice()) {
            Ok(rows) => {
                info!(rows = rows.len(), file = file_name, "statement ingested");
                self.state.ingest_rows(rows);
            }
            Err(e) => warn!("could not parse {file_name} locally: {e:#}"),
        }

        self.after_predictions_changed();
        true
    }

    /// Re-submit every local row as one combined CSV.
    pub async fn submit_entries(&mut self) -> bool {
        let bytes = match combined_csv(self.state.entries()) {
            Ok(b) => b,
            Err(e) => {
                error!("could not build combined csv: {e:#}");
                return false;
            }
        };
        let ticket = self.state.begin_upload();
        match self.backend.upload_csv(COMBINED_FILE_NAME.to_string(), bytes).await {
            Ok(payload) => {
                if !self.state.apply_upload(ticket, payload) {
                    return false;
                }
                self.after_predictions_changed();
                true
            }
            Err(e) => {
                error!("upload failed: {e:#}");
                false
            }
        }
    }

    /// Add a manual entry and re-submit. Invalid entries are ignored.
    pub async fn add_manual_entry(&mut self, entry: ManualEntry) -> bool {
        if self.state.add_manual_entry(entry).is_none() {
            return false;
        }
        self.submit_entries().await
    }

    /// Correct one predicted row, refresh suggestions and report the fix.
    pub fn fix_category(&mut self, index: usize, category: &str) -> bool {
        let Some(sample) = self.state.fix_category(index, category) else {
            return false;
        };
        self.request_savings();

        let backend = self.backend.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend
                .feedback(FeedbackRequest {
                    samples: vec![sample],
                })
                .await;
            let _ = tx.send(Completion::Feedback { result });
        });
        true
    }

    /// Ask for savings suggestions matching the current summary.
    pub fn request_savings(&mut self) {
        let Some(job) = self.state.begin_suggestions() else {
            return;
        };
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend.suggestions(job.query).await;
            let _ = tx.send(Completion::Suggestions {
                ticket: job.ticket,
                result,
            });
        });
    }

    /// Run the savings analysis over the local rows. Unlike the other
    /// calls, failures are returned so the caller can show them and retry.
    pub async fn analyze(&self) -> Result<SavingsAnalysis> {
        self.backend.analyze(self.state.analysis_transactions()).await
    }

    /// Wait for and apply one completion. Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        let Some(completion) = self.rx.recv().await else {
            return false;
        };
        self.in_flight -= 1;
        self.apply(completion);
        true
    }

    /// Apply completions until no spawned request is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Refinement { ticket, result } => {
                let current = self.state.is_current(ticket);
                self.state.complete_refinement(ticket, result);
                if current {
                    self.request_savings();
                }
            }
            Completion::Suggestions { ticket, result } => {
                self.state.complete_suggestions(ticket, result);
            }
            Completion::Feedback { result } => {
                if let Err(e) = result {
                    warn!("feedback failed: {e:#}");
                }
            }
        }
    }

    fn after_predictions_changed(&mut self) {
        match self.state.begin_refinement() {
            Some(job) => self.spawn_refinement(job),
            None => self.request_savings(),
        }
    }

    fn spawn_refinement(&mut self, job: RefineJob) {
        debug!(rows = job.request.rows.len(), "refining uncategorized rows");
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let result = backend.refine(job.request).await;
            let _ = tx.send(Completion::Refinement {
                ticket: job.ticket,
                result,
            });
        });
    }
}
