//! Judge0 status ids and their mapping onto [`Verdict`].
//!
//! Every caller classifies judge statuses through [`classify_status`]; adding a
//! new judge status is a single edit to [`STATUS_TABLE`].

use crate::Verdict;

/// Phase a judge status id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JudgeStatus {
    /// Queued or running on the judge; not a result yet.
    InFlight,
    /// Finished with the given verdict.
    Finished(Verdict),
}

impl JudgeStatus {
    pub fn verdict(&self) -> Option<Verdict> {
        match self {
            Self::InFlight => None,
            Self::Finished(verdict) => Some(*verdict),
        }
    }
}

/// Known Judge0 status ids: `(id, description, phase)`.
pub const STATUS_TABLE: &[(i32, &str, JudgeStatus)] = &[
    (1, "In Queue", JudgeStatus::InFlight),
    (2, "Processing", JudgeStatus::InFlight),
    (3, "Accepted", JudgeStatus::Finished(Verdict::Accepted)),
    (4, "Wrong Answer", JudgeStatus::Finished(Verdict::WrongAnswer)),
    (5, "Time Limit Exceeded", JudgeStatus::Finished(Verdict::TimeLimitExceeded)),
    (6, "Compilation Error", JudgeStatus::Finished(Verdict::CompilationError)),
    (7, "Runtime Error (SIGSEGV)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (8, "Runtime Error (SIGXFSZ)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (9, "Runtime Error (SIGFPE)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (10, "Runtime Error (SIGABRT)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (11, "Runtime Error (NZEC)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (12, "Runtime Error (Other)", JudgeStatus::Finished(Verdict::RuntimeError)),
    (13, "Internal Error", JudgeStatus::Finished(Verdict::RuntimeError)),
    (14, "Exec Format Error", JudgeStatus::Finished(Verdict::RuntimeError)),
];

/// Lowest status id that denotes a finished execution.
const FIRST_FINISHED_ID: i32 = 3;

/// Returns true if `id` can appear in a well-formed judge payload.
pub fn is_valid_status_id(id: i32) -> bool {
    id >= 1
}

/// Classify a judge status id.
///
/// Ids missing from the table are finished runtime/other errors when they
/// are past the accepted id, and in flight otherwise. Nothing here ever
/// turns a queued or running status into a verdict.
pub fn classify_status(id: i32) -> JudgeStatus {
    if let Some((_, _, status)) = STATUS_TABLE.iter().find(|(known, _, _)| *known == id) {
        return *status;
    }

    if id > FIRST_FINISHED_ID {
        JudgeStatus::Finished(Verdict::RuntimeError)
    } else {
        JudgeStatus::InFlight
    }
}

/// Human-readable description for a status id, if the id is known.
pub fn describe_status(id: i32) -> Option<&'static str> {
    STATUS_TABLE
        .iter()
        .find(|(known, _, _)| *known == id)
        .map(|(_, description, _)| *description)
}
