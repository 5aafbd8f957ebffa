use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    MatchResultId, Opportunity, OpportunityId, ResolvedApplication, Student, StudentId,
};

/// Read access to the externally owned student, opportunity and application records.
pub trait ApplicationStore: Send + Sync {
    /// Every application, with linked records looked up; missing links are `None`.
    fn resolved_applications(&self) -> Result<Vec<ResolvedApplication>, RepositoryError>;
    fn student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError>;
    fn opportunity(&self, id: &OpportunityId) -> Result<Option<Opportunity>, RepositoryError>;
}

/// Storage for persisted match results.
///
/// Results are only ever inserted or deleted in bulk; there is no update.
pub trait MatchResultRepository: Send + Sync {
    /// Removes every stored result, returning how many were deleted.
    fn delete_all(&self) -> Result<usize, RepositoryError>;
    fn insert(&self, result: NewMatchResult) -> Result<MatchResultRecord, RepositoryError>;
    /// All results in store order.
    fn list(&self) -> Result<Vec<MatchResultRecord>, RepositoryError>;
    fn list_for_student(&self, id: &StudentId) -> Result<Vec<MatchResultRecord>, RepositoryError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("write rejected: {0}")]
    Rejected(String),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Result payload handed to the store; the store assigns the id and timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMatchResult {
    pub student_id: StudentId,
    pub opportunity_id: Option<OpportunityId>,
    pub score: f64,
    pub explanation: String,
}

/// Persisted match result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultRecord {
    pub id: MatchResultId,
    pub student_id: StudentId,
    pub opportunity_id: Option<OpportunityId>,
    pub score: f64,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}

impl MatchResultRecord {
    pub fn from_new(id: MatchResultId, result: NewMatchResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            student_id: result.student_id,
            opportunity_id: result.opportunity_id,
            score: result.score,
            explanation: result.explanation,
            created_at,
        }
    }
}

/// Student display fields attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
    pub email: String,
}

impl From<&Student> for StudentSummary {
    fn from(student: &Student) -> Self {
        Self {
            id: student.id.clone(),
            name: student.name.clone(),
            email: student.email.clone(),
        }
    }
}

/// Opportunity display fields attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpportunitySummary {
    pub id: OpportunityId,
    pub title: String,
    pub company: String,
    pub location: String,
}

impl From<&Opportunity> for OpportunitySummary {
    fn from(opportunity: &Opportunity) -> Self {
        Self {
            id: opportunity.id.clone(),
            title: opportunity.title.clone(),
            company: opportunity.company.clone(),
            location: opportunity.location.clone().unwrap_or_default(),
        }
    }
}

/// Result as returned by the query endpoints, with references resolved for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultView {
    pub id: MatchResultId,
    pub student: Option<StudentSummary>,
    pub opportunity: Option<OpportunitySummary>,
    pub score: f64,
    pub explanation: String,
    pub created_at: DateTime<Utc>,
}
