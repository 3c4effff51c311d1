// src/runner/mod.rs
mod executor;
mod summary;

pub use executor::{IterationOutcome, RunOptions, Runner};
pub use summary::RunSummary;
