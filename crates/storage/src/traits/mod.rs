//! Storage trait abstraction
//!
//! Async domain traits for the ingest pipeline and read-only consumers.
//! `Storage` implements them by delegating to its synchronous methods on the
//! blocking thread pool.

mod location;
mod salary;

pub use location::LocationStore;
pub use salary::{SalaryStore, StatsStore};
