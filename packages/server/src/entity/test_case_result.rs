use common::Verdict;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "test_case_result")]
pub struct Model {
    /// Opaque judge token, one per dispatched test case.
    #[sea_orm(primary_key, auto_increment = false)]
    pub token: String,

    #[sea_orm(indexed)]
    pub submission_id: Uuid,
    #[sea_orm(belongs_to, from = "submission_id", to = "id")]
    pub submission: HasOne<super::submission::Entity>,

    /// 0-based fixture position, for display.
    pub ordinal: i32,

    pub verdict: Verdict,
    pub judge_status_id: Option<i32>,
    pub judge_status_description: Option<String>,

    pub time_ms: Option<i32>,   // in milliseconds
    pub memory_kb: Option<i32>, // in kilobytes

    #[sea_orm(column_type = "Text", nullable)]
    pub stdout: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub stderr: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub compile_output: Option<String>,

    /// Reconcile passes in which the judge did not recognise the token.
    pub fetch_misses: i32,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
