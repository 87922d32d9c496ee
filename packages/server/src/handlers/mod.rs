pub mod callback;
pub mod meta;
pub mod submission;
