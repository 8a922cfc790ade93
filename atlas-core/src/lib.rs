//! Core pipeline for the per-capita emissions analysis.
//!
//! The crate is an ordered, pure function pipeline: load the wide source
//! tables, reshape them to long form, join on `(country, year)` and the
//! continent reference, aggregate per-capita figures, and model threshold
//! scenarios. Each stage takes explicit inputs and returns explicit outputs;
//! nothing depends on hidden prior state.

pub mod aggregate;
pub mod errors;
pub mod join;
pub mod load;
pub mod records;
pub mod reference;
pub mod reshape;
pub mod scenario;
