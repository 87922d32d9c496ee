use common::SubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submission")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub problem_id: i32,
    #[sea_orm(belongs_to, from = "problem_id", to = "id")]
    pub problem: HasOne<super::problem::Entity>,

    /// Judge0 language id.
    pub language_id: i32,
    #[sea_orm(column_type = "Text")]
    pub source_code: String,

    pub status: SubmissionStatus,

    /// Set together with a terminal status.
    pub aggregate_time_ms: Option<i32>,
    pub aggregate_memory_kb: Option<i32>,

    #[sea_orm(has_many)]
    pub results: HasMany<super::test_case_result::Entity>,

    pub created_at: DateTimeUtc,
    pub finalized_at: Option<DateTimeUtc>,
}

impl ActiveModelBehavior for ActiveModel {}
