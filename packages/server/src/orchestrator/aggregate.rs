use common::{SubmissionStatus, Verdict};

/// The frozen outcome of a fully judged submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub status: SubmissionStatus,
    pub time_ms: i32,
    pub memory_kb: i32,
}

/// Aggregate per-test-case outcomes of `(verdict, time_ms, memory_kb)`.
///
/// Returns `None` while any verdict is pending or when there are no outcomes.
/// Missing time or memory counts as 0.
pub fn aggregate<I>(outcomes: I) -> Option<Aggregate>
where
    I: IntoIterator<Item = (Verdict, Option<i32>, Option<i32>)>,
{
    let mut seen = false;
    let mut all_accepted = true;
    let mut time_ms = 0;
    let mut memory_kb = 0;

    for (verdict, time, memory) in outcomes {
        if !verdict.is_terminal() {
            return None;
        }
        seen = true;
        all_accepted &= verdict.is_accepted();
        time_ms = time_ms.max(time.unwrap_or(0));
        memory_kb = memory_kb.max(memory.unwrap_or(0));
    }

    seen.then_some(Aggregate {
        status: if all_accepted {
            SubmissionStatus::Accepted
        } else {
            SubmissionStatus::Rejected
        },
        time_ms,
        memory_kb,
    })
}
