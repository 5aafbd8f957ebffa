//! Student-to-internship match scoring.
//!
//! The [`matching`] module owns the scoring engine, the batch run that replaces stored
//! match results, and the HTTP routes exposing both. Record stores for students,
//! opportunities and applications are supplied by the host through the repository traits.

pub mod config;
pub mod error;
pub mod matching;
pub mod telemetry;
