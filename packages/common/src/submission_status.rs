#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregate status of a submission.
///
/// A submission starts `Pending` and moves to exactly one of the terminal
/// states once every test case has a terminal verdict.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    /// At least one test case has not been judged yet.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PENDING"))]
    Pending,
    /// Every test case was accepted.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ACCEPTED"))]
    Accepted,
    /// Every test case is judged and at least one was not accepted.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "REJECTED"))]
    Rejected,
}

impl SubmissionStatus {
    /// Returns true once the status can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub const ALL: &'static [SubmissionStatus] = &[Self::Pending, Self::Accepted, Self::Rejected];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for SubmissionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Per-test-case outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum Verdict {
    /// Dispatched, no terminal result yet.
    #[serde(rename = "PENDING")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "PENDING"))]
    Pending,
    #[serde(rename = "AC")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "AC"))]
    Accepted,
    #[serde(rename = "WA")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "WA"))]
    WrongAnswer,
    #[serde(rename = "TLE")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "TLE"))]
    TimeLimitExceeded,
    #[serde(rename = "COMPILE_ERROR")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPILE_ERROR"))]
    CompilationError,
    /// Crashes, signals, non-zero exits and judge-side execution failures.
    #[serde(rename = "RUNTIME_ERROR")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "RUNTIME_ERROR"))]
    RuntimeError,
}

impl Verdict {
    /// Returns true once the verdict can no longer change.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    pub const ALL: &'static [Verdict] = &[
        Self::Pending,
        Self::Accepted,
        Self::WrongAnswer,
        Self::TimeLimitExceeded,
        Self::CompilationError,
        Self::RuntimeError,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "AC",
            Self::WrongAnswer => "WA",
            Self::TimeLimitExceeded => "TLE",
            Self::CompilationError => "COMPILE_ERROR",
            Self::RuntimeError => "RUNTIME_ERROR",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::Pending
    }
}

/// Error when parsing an invalid status or verdict string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
    expected: &'static [&'static str],
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value '{}'. Valid values: {}",
            self.invalid,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for SubmissionStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
                expected: &["PENDING", "ACCEPTED", "REJECTED"],
            })
    }
}

impl FromStr for Verdict {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|verdict| verdict.as_str() == s)
            .ok_or_else(|| ParseStatusError {
                invalid: s.to_string(),
                expected: &["PENDING", "AC", "WA", "TLE", "COMPILE_ERROR", "RUNTIME_ERROR"],
            })
    }
}
