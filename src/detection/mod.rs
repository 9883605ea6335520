//! Duplicate comment detection
//!
//! The pure part of the pipeline: normalizing comment text, deciding which
//! records count, tallying bodies per author and pulling out findings.

pub mod counters;
pub mod eligibility;
pub mod normalizer;

pub use counters::AuthorCounters;
pub use eligibility::is_eligible;
pub use normalizer::normalize;
