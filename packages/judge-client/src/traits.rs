use async_trait::async_trait;

use crate::error::JudgeClientError;
use crate::models::{FetchedStatus, TestInput};

/// An external service that executes and judges code.
///
/// Implementations are stateless adapters: they hold no per-submission state
/// beyond the lifetime of a single call.
#[async_trait]
pub trait JudgeBackend: Send + Sync {
    /// Dispatch one execution per input and return one token per input, in
    /// input order. Either every input is dispatched or an error is returned.
    async fn dispatch_batch(
        &self,
        language_id: i32,
        source_code: &str,
        inputs: &[TestInput],
    ) -> Result<Vec<String>, JudgeClientError>;

    /// Fetch the current judge-side state of each token, in token order.
    /// Tokens the judge does not know come back as `Unrecognised`.
    async fn fetch_batch(&self, tokens: &[String]) -> Result<Vec<FetchedStatus>, JudgeClientError>;
}
