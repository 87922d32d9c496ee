//! Submission fan-out, result recording and exactly-once finalization.
//!
//! The orchestrator holds no per-submission state: every decision is made
//! against the store, so push (callback) and pull (reconcile) delivery can
//! interleave freely.

pub mod aggregate;
pub mod error;

use std::sync::Arc;

use common::{JudgeStatus, SubmissionStatus, Verdict};
use judge_client::{FetchedStatus, JudgeBackend, JudgeReport};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

pub use aggregate::{Aggregate, aggregate};
pub use error::OrchestratorError;

use crate::config::{OrchestratorConfig, SubmissionConfig};
use crate::fixtures::load_fixtures;
use crate::store::SubmissionStore;

/// A submission that has been dispatched and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSubmission {
    pub id: Uuid,
    pub status: SubmissionStatus,
    pub test_case_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// Some test case is still pending.
    StillPending,
    /// This call froze the aggregate.
    Finalized(Aggregate),
    /// Another caller froze it first.
    AlreadyFinal(SubmissionStatus),
}

impl FinalizeOutcome {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            Self::StillPending => SubmissionStatus::Pending,
            Self::Finalized(aggregate) => aggregate.status,
            Self::AlreadyFinal(status) => *status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The verdict was stored by this call.
    Applied {
        submission_id: Uuid,
        verdict: Verdict,
        finalize: FinalizeOutcome,
    },
    /// The token already had a terminal verdict, which is kept. Finalize
    /// still runs so a redelivery completes an interrupted finalization.
    AlreadyTerminal {
        submission_id: Uuid,
        verdict: Verdict,
        finalize: FinalizeOutcome,
    },
    /// The judge is still queueing or running the token; nothing changed.
    StillRunning { submission_id: Uuid },
}

impl RecordOutcome {
    pub fn submission_id(&self) -> Uuid {
        match self {
            Self::Applied { submission_id, .. }
            | Self::AlreadyTerminal { submission_id, .. }
            | Self::StillRunning { submission_id } => *submission_id,
        }
    }
}

/// What one reconcile pass did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub submission_id: Uuid,
    /// Tokens whose verdict this pass stored.
    pub applied: usize,
    /// Tokens that turned out to be terminal already.
    pub already_terminal: usize,
    pub still_running: usize,
    /// Tokens the judge did not recognise on this pass.
    pub unrecognised: usize,
    /// Pending tokens skipped because their fetch-miss budget is spent.
    pub exhausted: usize,
    pub status: SubmissionStatus,
}

impl ReconcileSummary {
    fn empty(submission_id: Uuid, status: SubmissionStatus) -> Self {
        Self {
            submission_id,
            applied: 0,
            already_terminal: 0,
            still_running: 0,
            unrecognised: 0,
            exhausted: 0,
            status,
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    db: DatabaseConnection,
    judge: Arc<dyn JudgeBackend>,
    config: OrchestratorConfig,
    max_source_bytes: usize,
}

impl Orchestrator {
    pub fn new(
        db: DatabaseConnection,
        judge: Arc<dyn JudgeBackend>,
        config: OrchestratorConfig,
        submission: &SubmissionConfig,
    ) -> Self {
        Self {
            db,
            judge,
            config,
            max_source_bytes: submission.max_source_bytes,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Dispatch one execution per fixture and persist the submission.
    ///
    /// Nothing is persisted unless every fixture received a token.
    #[instrument(skip(self, source_code), fields(source_bytes = source_code.len()))]
    pub async fn create_submission(
        &self,
        problem_id: i32,
        language_id: i32,
        source_code: &str,
    ) -> Result<CreatedSubmission, OrchestratorError> {
        if source_code.trim().is_empty() {
            return Err(OrchestratorError::Validation(
                "Source code must not be empty".into(),
            ));
        }
        if source_code.len() > self.max_source_bytes {
            return Err(OrchestratorError::Validation(format!(
                "Source code exceeds {} bytes",
                self.max_source_bytes
            )));
        }

        let fixtures = load_fixtures(&self.db, problem_id).await?;
        if fixtures.is_empty() {
            return Err(OrchestratorError::ProblemNotFound(problem_id));
        }

        let tokens = self
            .judge
            .dispatch_batch(language_id, source_code, &fixtures)
            .await?;

        if tokens.len() != fixtures.len() {
            return Err(OrchestratorError::ExecutionServiceUnavailable(format!(
                "judge returned {} tokens for {} test cases",
                tokens.len(),
                fixtures.len()
            )));
        }

        let id = Uuid::new_v4();
        let txn = self.db.begin().await?;
        SubmissionStore::new(&txn)
            .insert_submission(id, problem_id, language_id, source_code, &tokens)
            .await?;
        txn.commit().await?;

        info!(
            submission_id = %id,
            problem_id,
            language_id,
            test_cases = tokens.len(),
            "Submission dispatched"
        );

        Ok(CreatedSubmission {
            id,
            status: SubmissionStatus::Pending,
            test_case_count: tokens.len(),
        })
    }

    /// Record a judge report for one token, finalizing the owning submission
    /// when it was the last pending test case.
    #[instrument(skip(self, report), fields(token = %report.token, status_id = report.status_id))]
    pub async fn record_result(
        &self,
        report: &JudgeReport,
    ) -> Result<RecordOutcome, OrchestratorError> {
        let store = SubmissionStore::new(&self.db);

        let Some(row) = store.find_result(&report.token).await? else {
            warn!(token = %report.token, "Result for unknown token");
            return Err(OrchestratorError::UnknownToken(report.token.clone()));
        };
        let submission_id = row.submission_id;

        let verdict = match report.status() {
            JudgeStatus::InFlight => {
                debug!(submission_id = %submission_id, "Token still running");
                return Ok(RecordOutcome::StillRunning { submission_id });
            }
            JudgeStatus::Finished(verdict) => verdict,
        };

        if row.verdict.is_terminal() {
            if row.verdict != verdict {
                warn!(
                    submission_id = %submission_id,
                    stored = %row.verdict,
                    reported = %verdict,
                    "Ignoring conflicting duplicate result"
                );
            }
            let finalize = self.finalize(submission_id).await?;
            return Ok(RecordOutcome::AlreadyTerminal {
                submission_id,
                verdict: row.verdict,
                finalize,
            });
        }

        if !store.apply_verdict(report, verdict).await? {
            // A concurrent delivery of the same token won.
            let stored = store
                .find_result(&report.token)
                .await?
                .map(|r| r.verdict)
                .unwrap_or(verdict);
            let finalize = self.finalize(submission_id).await?;
            return Ok(RecordOutcome::AlreadyTerminal {
                submission_id,
                verdict: stored,
                finalize,
            });
        }

        debug!(submission_id = %submission_id, verdict = %verdict, "Verdict recorded");

        let finalize = self.finalize(submission_id).await?;
        Ok(RecordOutcome::Applied {
            submission_id,
            verdict,
            finalize,
        })
    }

    /// Freeze the aggregate verdict once every test case is terminal.
    #[instrument(skip(self))]
    pub async fn finalize(&self, submission_id: Uuid) -> Result<FinalizeOutcome, OrchestratorError> {
        let store = SubmissionStore::new(&self.db);

        let submission = store
            .find_submission(submission_id)
            .await?
            .ok_or(OrchestratorError::SubmissionNotFound(submission_id))?;
        if submission.status.is_terminal() {
            return Ok(FinalizeOutcome::AlreadyFinal(submission.status));
        }

        let results = store.results_for(submission_id).await?;
        let Some(aggregate) = aggregate(
            results
                .iter()
                .map(|r| (r.verdict, r.time_ms, r.memory_kb)),
        ) else {
            return Ok(FinalizeOutcome::StillPending);
        };

        if store.finalize(submission_id, &aggregate).await? {
            info!(
                submission_id = %submission_id,
                status = %aggregate.status,
                time_ms = aggregate.time_ms,
                memory_kb = aggregate.memory_kb,
                "Submission finalized"
            );
            return Ok(FinalizeOutcome::Finalized(aggregate));
        }

        let status = store
            .find_submission(submission_id)
            .await?
            .map(|s| s.status)
            .unwrap_or(aggregate.status);
        Ok(FinalizeOutcome::AlreadyFinal(status))
    }

    /// Pull the judge-side state of every pending token and record it.
    ///
    /// Safe to run repeatedly and concurrently with callback delivery.
    #[instrument(skip(self))]
    pub async fn reconcile(&self, submission_id: Uuid) -> Result<ReconcileSummary, OrchestratorError> {
        let store = SubmissionStore::new(&self.db);

        let submission = store
            .find_submission(submission_id)
            .await?
            .ok_or(OrchestratorError::SubmissionNotFound(submission_id))?;
        if submission.status.is_terminal() {
            return Ok(ReconcileSummary::empty(submission_id, submission.status));
        }

        let budget = self.config.fetch_miss_budget;
        let (fetchable, exhausted): (Vec<_>, Vec<_>) = store
            .pending_results(submission_id)
            .await?
            .into_iter()
            .partition(|r| r.fetch_misses < budget);

        let mut summary = ReconcileSummary::empty(submission_id, SubmissionStatus::Pending);
        summary.exhausted = exhausted.len();
        if !exhausted.is_empty() {
            warn!(
                submission_id = %submission_id,
                tokens = exhausted.len(),
                budget,
                "Skipping tokens the judge no longer recognises"
            );
        }

        if !fetchable.is_empty() {
            let tokens: Vec<String> = fetchable.into_iter().map(|r| r.token).collect();
            let statuses = self.judge.fetch_batch(&tokens).await?;

            let mut misses = Vec::new();
            for status in statuses {
                match status {
                    FetchedStatus::Known(report) => match self.record_result(&report).await {
                        Ok(RecordOutcome::Applied { .. }) => summary.applied += 1,
                        Ok(RecordOutcome::AlreadyTerminal { .. }) => summary.already_terminal += 1,
                        Ok(RecordOutcome::StillRunning { .. }) => summary.still_running += 1,
                        Err(OrchestratorError::UnknownToken(token)) => misses.push(token),
                        Err(e) => return Err(e),
                    },
                    FetchedStatus::Unrecognised(token) => misses.push(token),
                }
            }

            summary.unrecognised = misses.len();
            store.record_fetch_misses(&misses).await?;
        }

        summary.status = self.finalize(submission_id).await?.status();

        info!(
            submission_id = %submission_id,
            applied = summary.applied,
            still_running = summary.still_running,
            unrecognised = summary.unrecognised,
            status = %summary.status,
            "Reconcile pass complete"
        );

        Ok(summary)
    }
}
