//! Core domain types and logic.

pub mod config_validation;
pub mod coordinates;
pub mod country;
pub mod error;
pub mod flow;
pub mod inspect;
pub mod normalize;
pub mod query;
pub mod raw_record;
pub mod stats;
