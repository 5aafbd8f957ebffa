use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{Opportunity, OpportunityId, Student, StudentId};
use super::repository::{
    ApplicationStore, MatchResultRecord, MatchResultRepository, MatchResultView, NewMatchResult,
    OpportunitySummary, RepositoryError, StudentSummary,
};
use super::scoring::{MatchScore, ScoringEngine};

/// Service composing the record stores and the scoring engine.
///
/// Runs are not serialized against each other: two concurrent calls to [`run`] interleave
/// their delete and insert phases.
///
/// [`run`]: MatchingService::run
pub struct MatchingService<S, M> {
    applications: Arc<S>,
    results: Arc<M>,
    engine: Arc<ScoringEngine>,
}

impl<S, M> MatchingService<S, M>
where
    S: ApplicationStore + 'static,
    M: MatchResultRepository + 'static,
{
    pub fn new(applications: Arc<S>, results: Arc<M>, engine: ScoringEngine) -> Self {
        Self {
            applications,
            results,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Replace every stored result with fresh scores for the current applications.
    ///
    /// Old results are deleted before anything is scored and are not restored if a later
    /// step fails; results created before the failure stay in the store.
    pub fn run(&self) -> Result<MatchRunSummary, MatchServiceError> {
        let removed = self.results.delete_all()?;
        debug!(removed, "cleared previous match results");

        let applications = self.applications.resolved_applications()?;
        let mut created_results = 0;

        for application in &applications {
            let Some((student, opportunity)) = application.pair() else {
                debug!(
                    application_id = %application.application_id,
                    student_resolved = application.student.is_some(),
                    opportunity_resolved = application.opportunity.is_some(),
                    "skipping application with unresolved links"
                );
                continue;
            };

            let MatchScore { score, breakdown } = self.engine.score(student, opportunity);
            self.results.insert(NewMatchResult {
                student_id: student.id.clone(),
                opportunity_id: Some(opportunity.id.clone()),
                score,
                explanation: breakdown.explanation()?,
            })?;
            created_results += 1;
        }

        let summary = MatchRunSummary {
            processed_applications: applications.len(),
            created_results,
        };
        info!(
            processed = summary.processed_applications,
            created = summary.created_results,
            skipped = summary.skipped(),
            "match run complete"
        );

        Ok(summary)
    }

    /// Every stored result, best score first.
    pub fn all_results(&self) -> Result<Vec<MatchResultView>, MatchServiceError> {
        let records = self.results.list()?;
        self.present(records)
    }

    /// Results belonging to one student, best score first.
    pub fn results_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<MatchResultView>, MatchServiceError> {
        let records = self.results.list_for_student(student_id)?;
        self.present(records)
    }

    fn present(
        &self,
        records: Vec<MatchResultRecord>,
    ) -> Result<Vec<MatchResultView>, MatchServiceError> {
        let mut students: HashMap<StudentId, Option<Student>> = HashMap::new();
        let mut opportunities: HashMap<OpportunityId, Option<Opportunity>> = HashMap::new();
        let mut views = Vec::with_capacity(records.len());

        for record in records {
            if !students.contains_key(&record.student_id) {
                let student = self.applications.student(&record.student_id)?;
                students.insert(record.student_id.clone(), student);
            }
            let student = students
                .get(&record.student_id)
                .and_then(Option::as_ref)
                .map(StudentSummary::from);

            let opportunity = match &record.opportunity_id {
                Some(id) => {
                    if !opportunities.contains_key(id) {
                        let opportunity = self.applications.opportunity(id)?;
                        opportunities.insert(id.clone(), opportunity);
                    }
                    opportunities
                        .get(id)
                        .and_then(Option::as_ref)
                        .map(OpportunitySummary::from)
                }
                None => None,
            };

            views.push(MatchResultView {
                id: record.id,
                student,
                opportunity,
                score: record.score,
                explanation: record.explanation,
                created_at: record.created_at,
            });
        }

        sort_by_score_desc(&mut views);
        Ok(views)
    }
}

/// Stable sort, so equal scores keep the store's order.
pub(crate) fn sort_by_score_desc(views: &mut [MatchResultView]) {
    views.sort_by(|left, right| right.score.total_cmp(&left.score));
}

/// Counts reported by a batch run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRunSummary {
    pub processed_applications: usize,
    pub created_results: usize,
}

impl MatchRunSummary {
    /// Applications skipped because a linked record could not be resolved.
    pub fn skipped(&self) -> usize {
        self.processed_applications - self.created_results
    }
}

/// Error raised by the matching service.
#[derive(Debug, thiserror::Error)]
pub enum MatchServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to encode score breakdown: {0}")]
    Explanation(#[from] serde_json::Error),
}
