use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::matching::auth::{USER_ID_HEADER, USER_ROLE_HEADER};
use crate::matching::domain::{
    AffirmativeCategory, Application, ApplicationId, MatchResultId, Opportunity, OpportunityId,
    ResolvedApplication, Student, StudentId,
};
use crate::matching::repository::{
    ApplicationStore, MatchResultRecord, MatchResultRepository, NewMatchResult, RepositoryError,
};
use crate::matching::{match_router, MatchWeights, MatchingService, ScoringEngine};

pub(super) fn student(id: &str, skills: &str, locations: &str) -> Student {
    Student {
        id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        email: format!("{id}@student.example"),
        skills: Some(skills.to_string()),
        location_preferences: Some(locations.to_string()),
        category: None,
    }
}

pub(super) fn opportunity(
    id: &str,
    description: &str,
    sector: &str,
    location: &str,
) -> Opportunity {
    Opportunity {
        id: OpportunityId(id.to_string()),
        title: format!("Opportunity {id}"),
        company: "Innotech Solutions".to_string(),
        description: Some(description.to_string()),
        sector: Some(sector.to_string()),
        location: Some(location.to_string()),
        affirmative_category: None,
    }
}

/// Student from the worked example: half the skills match, everything else matches.
pub(super) fn scenario_student() -> Student {
    Student {
        category: Some(AffirmativeCategory::Sc),
        ..student("stu-scenario", "python, react", "Remote")
    }
}

pub(super) fn scenario_opportunity() -> Opportunity {
    Opportunity {
        affirmative_category: Some(AffirmativeCategory::Sc),
        ..opportunity(
            "opp-scenario",
            "work on python services",
            "Python, Backend",
            "Remote",
        )
    }
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(MatchWeights::default())
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[derive(Default)]
pub(super) struct MemoryApplications {
    students: Mutex<HashMap<StudentId, Student>>,
    opportunities: Mutex<HashMap<OpportunityId, Opportunity>>,
    applications: Mutex<Vec<Application>>,
}

impl MemoryApplications {
    pub(super) fn add_student(&self, student: Student) {
        self.students
            .lock()
            .expect("student mutex poisoned")
            .insert(student.id.clone(), student);
    }

    pub(super) fn add_opportunity(&self, opportunity: Opportunity) {
        self.opportunities
            .lock()
            .expect("opportunity mutex poisoned")
            .insert(opportunity.id.clone(), opportunity);
    }

    pub(super) fn apply(&self, student: &Student, opportunity: &Opportunity) {
        let mut guard = self.applications.lock().expect("application mutex poisoned");
        let id = ApplicationId(format!("app-{}", guard.len() + 1));
        guard.push(Application {
            id,
            student_id: student.id.clone(),
            opportunity_id: opportunity.id.clone(),
        });
    }

    pub(super) fn remove_opportunity(&self, id: &OpportunityId) {
        self.opportunities
            .lock()
            .expect("opportunity mutex poisoned")
            .remove(id);
    }
}

impl ApplicationStore for MemoryApplications {
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
        Ok(self
            .students
            .lock()
            .expect("student mutex poisoned")
            .get(id)
            .cloned())
    }

    fn opportunity(&self, id: &OpportunityId) -> Result<Option<Opportunity>, RepositoryError> {
        Ok(self
            .opportunities
            .lock()
            .expect("opportunity mutex poisoned")
            .get(id)
            .cloned())
    }
}

#[derive(Default)]
pub(super) struct MemoryResults {
    records: Mutex<Vec<MatchResultRecord>>,
    sequence: AtomicUsize,
}

impl MemoryResults {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("results mutex poisoned").len()
    }

    pub(super) fn seed(&self, student_id: &str, opportunity_id: Option<&str>, score: f64) {
        let result = NewMatchResult {
            student_id: StudentId(student_id.to_string()),
            opportunity_id: opportunity_id.map(|id| OpportunityId(id.to_string())),
            score,
            explanation: "{}".to_string(),
        };
        self.insert(result).expect("seed insert succeeds");
    }
}

impl MatchResultRepository for MemoryResults {
    fn delete_all(&self) -> Result<usize, RepositoryError> {
        let mut guard = self.records.lock().expect("results mutex poisoned");
        let removed = guard.len();
        guard.clear();
        Ok(removed)
    }

    fn insert(&self, result: NewMatchResult) -> Result<MatchResultRecord, RepositoryError> {
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let created_at = Utc
            .with_ymd_and_hms(2025, 9, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp");
        let record =
            MatchResultRecord::from_new(MatchResultId(format!("mr-{id}")), result, created_at);
        self.records
            .lock()
            .expect("results mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        Ok(self.records.lock().expect("results mutex poisoned").clone())
    }

    fn list_for_student(&self, id: &StudentId) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .expect("results mutex poisoned")
            .iter()
            .filter(|record| &record.student_id == id)
            .cloned()
            .collect())
    }
}

/// Accepts a fixed number of inserts, then rejects every write.
pub(super) struct FlakyResults {
    inner: MemoryResults,
    remaining_inserts: AtomicUsize,
}

impl FlakyResults {
    pub(super) fn failing_after(inserts: usize) -> Self {
        Self {
            inner: MemoryResults::default(),
            remaining_inserts: AtomicUsize::new(inserts),
        }
    }

    pub(super) fn len(&self) -> usize {
        self.inner.len()
    }
}

impl MatchResultRepository for FlakyResults {
    fn delete_all(&self) -> Result<usize, RepositoryError> {
        self.inner.delete_all()
    }

    fn insert(&self, result: NewMatchResult) -> Result<MatchResultRecord, RepositoryError> {
        let allowed = self
            .remaining_inserts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if allowed {
            self.inner.insert(result)
        } else {
            Err(RepositoryError::Rejected("disk full".to_string()))
        }
    }

    fn list(&self) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        self.inner.list()
    }

    fn list_for_student(&self, id: &StudentId) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        self.inner.list_for_student(id)
    }
}

pub(super) struct UnavailableResults;

impl MatchResultRepository for UnavailableResults {
    fn delete_all(&self) -> Result<usize, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert(&self, _result: NewMatchResult) -> Result<MatchResultRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_for_student(
        &self,
        _id: &StudentId,
    ) -> Result<Vec<MatchResultRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) type MemoryService = MatchingService<MemoryApplications, MemoryResults>;

/// Three students, three opportunities, four applications.
pub(super) fn build_service() -> (MemoryService, Arc<MemoryApplications>, Arc<MemoryResults>) {
    let applications = Arc::new(MemoryApplications::default());
    let results = Arc::new(MemoryResults::default());

    let alice = student("stu-alice", "python, machine learning", "Bengaluru, Remote");
    let bob = Student {
        category: Some(AffirmativeCategory::Sc),
        ..student("stu-bob", "javascript, react", "Pune")
    };
    let esha = student("stu-esha", "", "Remote");

    let research = Opportunity {
        affirmative_category: Some(AffirmativeCategory::Sc),
        ..opportunity("opp-research", "nlp research", "AI, Machine Learning", "Bengaluru")
    };
    let frontend = opportunity("opp-frontend", "react, javascript", "Web Development", "Pune");
    let design = opportunity("opp-design", "prototyping", "Education, UX/UI Design", "Remote");

    for record in [&alice, &bob, &esha] {
        applications.add_student(record.clone());
    }
    for record in [&research, &frontend, &design] {
        applications.add_opportunity(record.clone());
    }
    applications.apply(&alice, &research);
    applications.apply(&bob, &frontend);
    applications.apply(&bob, &research);
    applications.apply(&esha, &design);

    let service = MatchingService::new(applications.clone(), results.clone(), engine());
    (service, applications, results)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    match_router(Arc::new(service))
}

pub(super) fn request(
    method: &str,
    uri: &str,
    identity: Option<(&str, &str)>,
) -> axum::http::Request<axum::body::Body> {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    if let Some((user_id, role)) = identity {
        builder = builder
            .header(USER_ID_HEADER, user_id)
            .header(USER_ROLE_HEADER, role);
    }
    builder
        .body(axum::body::Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
