pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use client::Judge0Client;
pub use config::Judge0Config;
pub use error::{JudgeClientError, ReportError};
pub use models::{FetchedStatus, JudgeReport, TestInput, WireResult, WireStatus};
pub use traits::JudgeBackend;
