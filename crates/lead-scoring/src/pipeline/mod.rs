//! Batch orchestration: validate, filter, dedup, score, rank.

pub mod ranking;
pub mod runner;

pub use ranking::{compare_results, rank};
pub use runner::LeadPipeline;
