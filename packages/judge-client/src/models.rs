use common::judge_status::{JudgeStatus, classify_status, is_valid_status_id};
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::error::ReportError;

/// Stdin and expected output for one test case.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestInput {
    pub stdin: String,
    pub expected_output: String,
}

/// Request body of `POST /submissions/batch`.
#[derive(Debug, Serialize)]
pub struct BatchSubmitRequest {
    pub submissions: Vec<WireSubmission>,
}

/// One execution request, fields already base64-encoded.
#[derive(Debug, Serialize)]
pub struct WireSubmission {
    pub language_id: i32,
    pub source_code: String,
    pub stdin: String,
    pub expected_output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Response body of `GET /submissions/batch`.
#[derive(Debug, Deserialize)]
pub struct BatchFetchResponse {
    #[serde(default)]
    pub submissions: Vec<Option<WireResult>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireStatus {
    pub id: i32,
    #[serde(default)]
    pub description: String,
}

/// Seconds as reported by the judge: usually a string ("0.002"), sometimes a number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireSeconds {
    Number(f64),
    Text(String),
}

impl WireSeconds {
    fn to_ms(&self) -> Result<i32, ReportError> {
        let seconds = match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        };
        seconds.and_then(codec::seconds_to_ms).ok_or_else(|| {
            ReportError::InvalidTime(match self {
                Self::Number(n) => n.to_string(),
                Self::Text(s) => s.clone(),
            })
        })
    }
}

/// A submission as the judge reports it, both in batch fetches and in
/// completion callbacks. Output fields are base64 when the request was.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireResult {
    pub token: String,
    #[serde(default)]
    pub status: Option<WireStatus>,
    #[serde(default)]
    pub time: Option<WireSeconds>,
    #[serde(default)]
    pub memory: Option<i64>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub stderr: Option<String>,
    #[serde(default)]
    pub compile_output: Option<String>,
}

/// A validated, decoded judge result for one token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JudgeReport {
    pub token: String,
    pub status_id: i32,
    pub status_description: String,
    /// Wall time in milliseconds.
    pub time_ms: Option<i32>,
    /// Peak memory in kilobytes.
    pub memory_kb: Option<i32>,
    pub stdout: Option<String>,
    pub stderr: Option<String>,
    pub compile_output: Option<String>,
}

impl JudgeReport {
    pub fn status(&self) -> JudgeStatus {
        classify_status(self.status_id)
    }

    /// Validate and decode a wire result whose output fields are base64.
    pub fn from_wire(wire: WireResult) -> Result<Self, ReportError> {
        let token = wire.token.trim().to_string();
        if token.is_empty() {
            return Err(ReportError::EmptyToken);
        }

        let status = wire.status.ok_or(ReportError::MissingStatus)?;
        if !is_valid_status_id(status.id) {
            return Err(ReportError::InvalidStatusId(status.id));
        }

        let time_ms = wire.time.as_ref().map(WireSeconds::to_ms).transpose()?;

        let memory_kb = match wire.memory {
            None => None,
            Some(kb) => Some(
                i32::try_from(kb)
                    .ok()
                    .filter(|kb| *kb >= 0)
                    .ok_or(ReportError::InvalidMemory(kb))?,
            ),
        };

        Ok(Self {
            token,
            status_id: status.id,
            status_description: status.description,
            time_ms,
            memory_kb,
            stdout: decode_field(wire.stdout, "stdout")?,
            stderr: decode_field(wire.stderr, "stderr")?,
            compile_output: decode_field(wire.compile_output, "compile_output")?,
        })
    }
}

fn decode_field(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<String>, ReportError> {
    match value {
        None => Ok(None),
        Some(encoded) => codec::decode(&encoded)
            .map(Some)
            .ok_or(ReportError::InvalidBase64(field)),
    }
}

/// Judge-side state of one polled token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchedStatus {
    Known(JudgeReport),
    /// The judge has no usable record of this token.
    Unrecognised(String),
}

impl FetchedStatus {
    pub fn token(&self) -> &str {
        match self {
            Self::Known(report) => &report.token,
            Self::Unrecognised(token) => token,
        }
    }
}
