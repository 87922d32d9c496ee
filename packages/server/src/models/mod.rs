pub mod callback;
pub mod language;
pub mod submission;
