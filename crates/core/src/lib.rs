//! Core types and pure functions for oews-atlas
//!
//! This crate contains domain types shared across all other crates:
//! spreadsheet cell normalization, MSA title parsing, slugs, and the
//! Location / SalaryData records written by the ingest pipeline.

pub mod constants;
mod area;
mod env_config;
mod error;
mod location;
mod msa;
mod salary;
mod slug;
mod states;
mod value;

pub use area::*;
pub use env_config::*;
pub use error::*;
pub use location::*;
pub use msa::*;
pub use salary::*;
pub use slug::*;
pub use states::*;
pub use value::*;
