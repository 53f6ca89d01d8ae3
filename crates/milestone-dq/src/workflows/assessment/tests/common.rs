use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::assessment::domain::{
    AnswerEntry, AnswerSheet, AssessmentId, AssessmentSubmission, ChildId, ChildSnapshot,
    DevelopmentalDomain, DomainScores,
};
use crate::workflows::assessment::evaluation::ScoringConfig;
use crate::workflows::assessment::guard::{RequesterIdentity, Role};
use crate::workflows::assessment::repository::{
    ArtifactError, ArtifactReference, ArtifactStore, AssessmentRecord, AssessmentRepository,
    RepositoryError,
};
use crate::workflows::assessment::service::AssessmentService;
use crate::workflows::catalog::ItemCatalog;

/// Item bank covering brackets 9 and 10 with the same per-cell item counts
/// as the published divisor table.
pub(super) const SAMPLE_BANK: &str = "\
item_id,name,method,pass_criterion,sort,month_age
111,Sits steadily without support,Seat the child on a mat,Sits one minute without toppling,1,9
112,Pulls to stand,Place hands on a rail,Pulls up to standing once,1,9
121,Cruises along furniture,Observe cruising along a low table,Takes three sideways steps,1,10
122,Stands briefly unaided,Stand the child and release support,Holds balance for two seconds,1,10
211,Bangs two cubes together,Offer a cube to each hand,Brings cubes together at midline,2,9
212,Rakes a pellet,Place a pellet on the tray,Rakes it toward the palm,2,9
221,Pincer grasp,Offer a small pellet,Picks it up between thumb and finger,2,10
311,Imitates sounds,Repeat a syllable to the child,Echoes the syllable back,3,9
312,Responds to own name,Call the child from behind,Turns toward the caller,3,9
321,Says mama or dada specifically,Ask the caregiver about babble,Uses one word for a parent,3,10
322,Waves bye-bye on request,Say goodbye and wave,Waves without a model,3,10
411,Uncovers a hidden toy,Hide a toy under a cloth,Lifts the cloth to find it,4,9
412,Pulls string to get ring,Place a ring on a string,Pulls the string deliberately,4,9
421,Looks into a cup for a cube,Drop a cube into a cup,Tips or reaches into the cup,4,10
511,Plays peekaboo,Start a peekaboo exchange,Joins the game with anticipation,5,9
521,Offers a toy to the examiner,Hold out an open hand,Extends a toy toward the hand,5,10
522,Resists toy removal,Gently pull a held toy,Holds on or protests,5,10
";

pub(super) fn catalog() -> ItemCatalog {
    ItemCatalog::from_reader(Cursor::new(SAMPLE_BANK)).expect("sample bank parses")
}

pub(super) fn child() -> ChildSnapshot {
    ChildSnapshot {
        child_id: ChildId("child-001".to_string()),
        name: "Mei".to_string(),
        birth_date: NaiveDate::from_ymd_opt(2024, 10, 5).expect("valid date"),
    }
}

/// Ten whole months after the sample child's birth date.
pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 5).expect("valid date")
}

pub(super) fn examiner() -> RequesterIdentity {
    RequesterIdentity {
        user_id: "t-100".to_string(),
        role: Role::Teacher,
    }
}

pub(super) fn guardian() -> RequesterIdentity {
    RequesterIdentity {
        user_id: "p-200".to_string(),
        role: Role::Guardian,
    }
}

pub(super) fn answer(item_id: u32, month_age: u32, passed: bool) -> AnswerEntry {
    AnswerEntry {
        item_id,
        month_age,
        passed,
    }
}

/// Every bracket-10 item passed on top of a nine-month baseline: each
/// domain lands on exactly 10.0 months of mental age.
pub(super) fn submission() -> AssessmentSubmission {
    let mut answers = AnswerSheet::default();
    answers.record(DevelopmentalDomain::GrossMotor, answer(121, 10, true));
    answers.record(DevelopmentalDomain::GrossMotor, answer(122, 10, true));
    answers.record(DevelopmentalDomain::FineMotor, answer(221, 10, true));
    answers.record(DevelopmentalDomain::Language, answer(321, 10, true));
    answers.record(DevelopmentalDomain::Language, answer(322, 10, true));
    answers.record(DevelopmentalDomain::Adaptability, answer(421, 10, true));
    answers.record(DevelopmentalDomain::Social, answer(521, 10, true));
    answers.record(DevelopmentalDomain::Social, answer(522, 10, true));

    AssessmentSubmission {
        child: child(),
        baseline: DomainScores([9.0; 5]),
        answers,
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryRepository, MemoryArtifacts>,
    Arc<MemoryRepository>,
    Arc<MemoryArtifacts>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let artifacts = Arc::new(MemoryArtifacts::default());
    let service = AssessmentService::new(
        repository.clone(),
        artifacts.clone(),
        Arc::new(catalog()),
        ScoringConfig::standard(),
    );
    (service, repository, artifacts)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AssessmentId, AssessmentRecord>>>,
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.assessment_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.assessment_id.clone(), record.clone());
        Ok(record)
    }

    fn attach_artifact(
        &self,
        id: &AssessmentId,
        artifact: ArtifactReference,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        record.artifact = Some(artifact);
        Ok(())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn latest_final_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.child.child_id == *child_id && record.artifact.is_some())
            .max_by(|a, b| {
                a.recorded_on
                    .cmp(&b.recorded_on)
                    .then_with(|| a.assessment_id.0.cmp(&b.assessment_id.0))
            })
            .cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryArtifacts {
    fail_next: Arc<AtomicBool>,
    generated: Arc<Mutex<Vec<ArtifactReference>>>,
}

impl MemoryArtifacts {
    pub(super) fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub(super) fn generated(&self) -> Vec<ArtifactReference> {
        self.generated.lock().expect("artifact mutex poisoned").clone()
    }
}

impl ArtifactStore for MemoryArtifacts {
    fn generate(&self, record: &AssessmentRecord) -> Result<ArtifactReference, ArtifactError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(ArtifactError::Generation("renderer offline".to_string()));
        }
        let artifact = ArtifactReference(format!("artifacts/report_{}.pdf", record.assessment_id));
        self.generated
            .lock()
            .expect("artifact mutex poisoned")
            .push(artifact.clone());
        Ok(artifact)
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn attach_artifact(
        &self,
        _id: &AssessmentId,
        _artifact: ArtifactReference,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn latest_final_for_child(
        &self,
        _child_id: &ChildId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
