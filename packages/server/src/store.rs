use chrono::{DateTime, Utc};
use common::{SubmissionStatus, Verdict};
use judge_client::JudgeReport;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::entity::{submission, test_case_result};
use crate::orchestrator::aggregate::Aggregate;

/// Durable submission and per-test-case state.
///
/// Every mutation is a single conditional statement, so concurrent callers
/// racing on the same row see at most one winner.
pub struct SubmissionStore<'a, C: ConnectionTrait> {
    conn: &'a C,
}

impl<'a, C: ConnectionTrait> SubmissionStore<'a, C> {
    pub fn new(conn: &'a C) -> Self {
        Self { conn }
    }

    /// Insert a new `PENDING` submission with one `PENDING` result per token,
    /// ordinals following token order. Run inside a transaction.
    pub async fn insert_submission(
        &self,
        id: Uuid,
        problem_id: i32,
        language_id: i32,
        source_code: &str,
        tokens: &[String],
    ) -> Result<(), DbErr> {
        let now = Utc::now();

        submission::Entity::insert(submission::ActiveModel {
            id: Set(id),
            problem_id: Set(problem_id),
            language_id: Set(language_id),
            source_code: Set(source_code.to_string()),
            status: Set(SubmissionStatus::Pending),
            aggregate_time_ms: Set(None),
            aggregate_memory_kb: Set(None),
            created_at: Set(now),
            finalized_at: Set(None),
            ..Default::default()
        })
        .exec_without_returning(self.conn)
        .await?;

        for (ordinal, token) in tokens.iter().enumerate() {
            test_case_result::Entity::insert(test_case_result::ActiveModel {
                token: Set(token.clone()),
                submission_id: Set(id),
                ordinal: Set(ordinal as i32),
                verdict: Set(Verdict::Pending),
                judge_status_id: Set(None),
                judge_status_description: Set(None),
                time_ms: Set(None),
                memory_kb: Set(None),
                stdout: Set(None),
                stderr: Set(None),
                compile_output: Set(None),
                fetch_misses: Set(0),
                updated_at: Set(now),
                ..Default::default()
            })
            .exec_without_returning(self.conn)
            .await?;
        }

        Ok(())
    }

    pub async fn find_submission(&self, id: Uuid) -> Result<Option<submission::Model>, DbErr> {
        submission::Entity::find_by_id(id).one(self.conn).await
    }

    pub async fn find_result(&self, token: &str) -> Result<Option<test_case_result::Model>, DbErr> {
        test_case_result::Entity::find_by_id(token.to_string())
            .one(self.conn)
            .await
    }

    /// All results of a submission, by ordinal.
    pub async fn results_for(&self, id: Uuid) -> Result<Vec<test_case_result::Model>, DbErr> {
        test_case_result::Entity::find()
            .filter(test_case_result::Column::SubmissionId.eq(id))
            .order_by_asc(test_case_result::Column::Ordinal)
            .all(self.conn)
            .await
    }

    /// Non-terminal results of a submission, by ordinal.
    pub async fn pending_results(
        &self,
        id: Uuid,
    ) -> Result<Vec<test_case_result::Model>, DbErr> {
        test_case_result::Entity::find()
            .filter(test_case_result::Column::SubmissionId.eq(id))
            .filter(test_case_result::Column::Verdict.eq(Verdict::Pending))
            .order_by_asc(test_case_result::Column::Ordinal)
            .all(self.conn)
            .await
    }

    /// Set the terminal verdict of a token if it is still `PENDING`.
    ///
    /// Returns false when another writer got there first.
    pub async fn apply_verdict(
        &self,
        report: &JudgeReport,
        verdict: Verdict,
    ) -> Result<bool, DbErr> {
        let result = test_case_result::Entity::update_many()
            .set(test_case_result::ActiveModel {
                verdict: Set(verdict),
                judge_status_id: Set(Some(report.status_id)),
                judge_status_description: Set(Some(report.status_description.clone())),
                time_ms: Set(report.time_ms),
                memory_kb: Set(report.memory_kb),
                stdout: Set(report.stdout.clone()),
                stderr: Set(report.stderr.clone()),
                compile_output: Set(report.compile_output.clone()),
                updated_at: Set(Utc::now()),
                ..Default::default()
            })
            .filter(test_case_result::Column::Token.eq(report.token.as_str()))
            .filter(test_case_result::Column::Verdict.eq(Verdict::Pending))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Count one more judge miss for each still-pending token.
    pub async fn record_fetch_misses(&self, tokens: &[String]) -> Result<u64, DbErr> {
        if tokens.is_empty() {
            return Ok(0);
        }

        let result = test_case_result::Entity::update_many()
            .col_expr(
                test_case_result::Column::FetchMisses,
                Expr::cust("fetch_misses + 1"),
            )
            .col_expr(
                test_case_result::Column::UpdatedAt,
                Expr::value(Utc::now()),
            )
            .filter(test_case_result::Column::Token.is_in(tokens.iter().map(String::as_str)))
            .filter(test_case_result::Column::Verdict.eq(Verdict::Pending))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected)
    }

    /// Freeze the aggregate of a submission if it is still `PENDING`.
    ///
    /// Returns false when the submission was already final.
    pub async fn finalize(&self, id: Uuid, aggregate: &Aggregate) -> Result<bool, DbErr> {
        let result = submission::Entity::update_many()
            .set(submission::ActiveModel {
                status: Set(aggregate.status),
                aggregate_time_ms: Set(Some(aggregate.time_ms)),
                aggregate_memory_kb: Set(Some(aggregate.memory_kb)),
                finalized_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(submission::Column::Id.eq(id))
            .filter(submission::Column::Status.eq(SubmissionStatus::Pending))
            .exec(self.conn)
            .await?;

        Ok(result.rows_affected == 1)
    }

    /// Oldest submissions still `PENDING` that were created before `before`.
    pub async fn stale_pending(
        &self,
        before: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Uuid>, DbErr> {
        submission::Entity::find()
            .select_only()
            .column(submission::Column::Id)
            .filter(submission::Column::Status.eq(SubmissionStatus::Pending))
            .filter(submission::Column::CreatedAt.lt(before))
            .order_by_asc(submission::Column::CreatedAt)
            .limit(limit)
            .into_tuple()
            .all(self.conn)
            .await
    }
}
