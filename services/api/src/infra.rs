use chrono::Utc;
use intern_match::error::AppError;
use intern_match::matching::{
    Application, ApplicationStore, MatchDataset, MatchResultId, MatchResultRecord,
    MatchResultRepository, NewMatchResult, Opportunity, OpportunityId, RepositoryError,
    ResolvedApplication, Student, StudentId,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Student, opportunity and application records held in process memory.
#[derive(Default)]
pub(crate) struct InMemoryApplicationStore {
    students: Mutex<HashMap<StudentId, Student>>,
    opportunities: Mutex<HashMap<OpportunityId, Opportunity>>,
    applications: Mutex<Vec<Application>>,
}

impl InMemoryApplicationStore {
    pub(crate) fn from_dataset(dataset: MatchDataset) -> Self {
        let MatchDataset {
            students,
            opportunities,
            applications,
        } = dataset;

        Self {
            students: Mutex::new(
                students
                    .into_iter()
                    .map(|student| (student.id.clone(), student))
                    .collect(),
            ),
            opportunities: Mutex::new(
                opportunities
                    .into_iter()
                    .map(|opportunity| (opportunity.id.clone(), opportunity))
                    .collect(),
            ),
            applications: Mutex::new(applications),
        }
    }

    pub(crate) fn application_count(&self) -> usize {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .len()
    }
}

impl ApplicationStore for InMemoryApplicationStore {
    fn resolved_applications(&self) -> Result<Vec<ResolvedApplication>, RepositoryError> {
        let applications = self.applications.lock().expect("application mutex poisoned");
        let students = self.students.lock().expect("student mutex poisoned");
        let opportunities = self.opportunities.lock().expect("opportunity mutex poisoned");

        Ok(applications
            .iter()
            .map(|application| ResolvedApplication {
                application_id: application.id.clone(),
                student: students.get(&application.student_id).cloned(),
                opportunity: opportunities.get(&application.opportunity_id).cloned(),
            })
            .collect())
    }

    fn student(&self, id: &StudentId) -> Result<Option<Student>, RepositoryError> {
        let guard = self.students.lock().expect("student mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn opportunity(&self, id: &OpportunityId) -> Result<Option<Opportunity>, RepositoryError> {
        let guard = self.opportunities.lock().expect("opportunity mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Match results kept in insertion order.
#[derive(Default)]
pub(crate) struct InMemoryMatchResultRepository {
    records: Mutex<Vec<MatchResultRecord>>,
    sequence: AtomicU64,
}

impl InMemoryMatchResultRepository {
    fn next_id(&self) -> MatchResultId {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        MatchResultId(format!("mr-{id:06}"))
    }
}

impl MatchResultRepository for InMemoryMatchResultRepository {
    fn delete_all(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("results mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }

    fn insert(&self, result: NewMatchResult) -> Result<MatchResultRecord, RepositoryError> {
        let record = MatchResultRecord::from_new(self.next_id(), result, Utc::now());
        let mut guard = self.records.lock().expect("results mutex poisoned");
        guard.push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("results mutex poisoned");
        Ok(guard.clone())
    }

    fn list_for_student(&self, id: &StudentId) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        let guard = self.records.lock().expect("results mutex poisoned");
        Ok(guard
            .iter()
            .filter(|record| &record.student_id == id)
            .cloned()
            .collect())
    }
}

/// Reads the dataset at `path`, or starts empty when no path is configured.
pub(crate) fn load_dataset(path: Option<&Path>) -> Result<MatchDataset, AppError> {
    match path {
        Some(path) => {
            let dataset = MatchDataset::from_path(path)?;
            info!(
                path = %path.display(),
                students = dataset.students.len(),
                opportunities = dataset.opportunities.len(),
                applications = dataset.applications.len(),
                "loaded match dataset"
            );
            Ok(dataset)
        }
        None => Ok(MatchDataset::default()),
    }
}
