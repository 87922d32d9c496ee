//! Test fixtures: ordered (input, expected output) pairs per problem.

use std::path::{Path, PathBuf};

use chrono::Utc;
use judge_client::TestInput;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::entity::{problem, test_case};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Load the fixtures of a problem in dispatch order.
///
/// An unknown problem and a problem without test cases both yield an empty list.
pub async fn load_fixtures<C: ConnectionTrait>(
    db: &C,
    problem_id: i32,
) -> Result<Vec<TestInput>, DbErr> {
    let rows = test_case::Entity::find()
        .filter(test_case::Column::ProblemId.eq(problem_id))
        .order_by_asc(test_case::Column::Position)
        .order_by_asc(test_case::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|tc| TestInput {
            stdin: tc.input,
            expected_output: tc.expected_output,
        })
        .collect())
}

/// Split fixture files into cases: one case per non-empty trimmed line,
/// inputs and outputs paired by index. A missing output pairs with "".
pub fn pair_lines(inputs: &str, outputs: &str) -> Vec<TestInput> {
    let mut outputs = outputs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty());

    inputs
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|stdin| TestInput {
            stdin: stdin.to_string(),
            expected_output: outputs.next().unwrap_or_default().to_string(),
        })
        .collect()
}

/// Replace the fixtures of one problem, creating the problem if needed.
pub async fn replace_fixtures(
    db: &DatabaseConnection,
    problem_id: i32,
    title: &str,
    cases: &[TestInput],
) -> Result<(), DbErr> {
    let txn = db.begin().await?;
    let now = Utc::now();

    problem::Entity::insert(problem::ActiveModel {
        id: Set(problem_id),
        title: Set(title.to_string()),
        created_at: Set(now),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::column(problem::Column::Id)
            .update_column(problem::Column::Title)
            .to_owned(),
    )
    .exec_without_returning(&txn)
    .await?;

    test_case::Entity::delete_many()
        .filter(test_case::Column::ProblemId.eq(problem_id))
        .exec(&txn)
        .await?;

    for (position, case) in cases.iter().enumerate() {
        test_case::Entity::insert(test_case::ActiveModel {
            problem_id: Set(problem_id),
            position: Set(position as i32),
            input: Set(case.stdin.clone()),
            expected_output: Set(case.expected_output.clone()),
            created_at: Set(now),
            ..Default::default()
        })
        .exec_without_returning(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub problems: usize,
    pub test_cases: usize,
}

/// Import every `<dir>/<problem_id>/{input,output}.txt` pair.
///
/// Entries whose name is not a problem id, or that lack `input.txt`, are
/// skipped. An optional `title.txt` names the problem.
pub async fn import_dir(db: &DatabaseConnection, dir: &Path) -> Result<ImportSummary, FixtureError> {
    let mut entries = tokio::fs::read_dir(dir).await.map_err(|source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut summary = ImportSummary::default();

    while let Some(entry) = entries.next_entry().await.map_err(|source| FixtureError::Io {
        path: dir.to_path_buf(),
        source,
    })? {
        let path = entry.path();
        let Some(problem_id) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.parse::<i32>().ok())
        else {
            continue;
        };

        let input_path = path.join("input.txt");
        if !input_path.is_file() {
            warn!(path = %path.display(), "Skipping fixture directory without input.txt");
            continue;
        }

        let inputs = read_file(&input_path).await?;
        let outputs = read_optional(&path.join("output.txt")).await?;
        let title = read_optional(&path.join("title.txt")).await?;
        let title = match title.trim() {
            "" => format!("Problem {problem_id}"),
            t => t.to_string(),
        };

        let cases = pair_lines(&inputs, &outputs);
        replace_fixtures(db, problem_id, &title, &cases).await?;

        info!(problem_id, test_cases = cases.len(), "Imported fixtures");
        summary.problems += 1;
        summary.test_cases += cases.len();
    }

    Ok(summary)
}

async fn read_file(path: &Path) -> Result<String, FixtureError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn read_optional(path: &Path) -> Result<String, FixtureError> {
    if path.is_file() {
        read_file(path).await
    } else {
        Ok(String::new())
    }
}
