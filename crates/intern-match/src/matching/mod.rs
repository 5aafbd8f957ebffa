//! Match scoring, the full-replace batch run, and the result listings.

pub mod auth;
pub mod dataset;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use auth::{AuthError, Caller, Role};
pub use dataset::{DatasetError, MatchDataset};
pub use domain::{
    AffirmativeCategory, Application, ApplicationId, MatchResultId, Opportunity, OpportunityId,
    ResolvedApplication, Student, StudentId, UnknownCategory,
};
pub use repository::{
    ApplicationStore, MatchResultRecord, MatchResultRepository, MatchResultView, NewMatchResult,
    OpportunitySummary, RepositoryError, StudentSummary,
};
pub use router::match_router;
pub use scoring::{round_score, MatchScore, MatchWeights, ScoreBreakdown, ScoringEngine};
pub use service::{MatchRunSummary, MatchServiceError, MatchingService};
