//! The subset of the parquet schema model needed to describe leaf columns.
pub mod types;

pub use crate::parquet_bridge::Repetition;
