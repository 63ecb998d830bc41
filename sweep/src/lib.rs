//! Driver around [`jump_bucketing`]: loads identifiers, sweeps a range of
//! bucket counts and renders the resulting distributions.

pub mod ids;
pub mod report;
pub mod stats;
pub mod sweep;

pub use sweep::{Algorithm, Case, Outcome, SweepError, SweepPlan};
