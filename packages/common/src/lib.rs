pub mod judge_status;
pub mod language;
pub mod retry;
pub mod submission_status;

pub use judge_status::{JudgeStatus, classify_status};
pub use language::{LANGUAGES, Language};
pub use submission_status::{SubmissionStatus, Verdict};
