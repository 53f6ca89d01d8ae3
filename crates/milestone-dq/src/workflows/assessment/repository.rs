use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{AnswerSheet, AssessmentId, AssessmentStatus, ChildId, ChildSnapshot};
use super::evaluation::AssessmentOutcome;

/// Storage key or URL of a rendered report document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReference(pub String);

/// Repository record: who was assessed, the scored outcome, the raw answer
/// sheet, and the artifact state that decides visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub assessment_id: AssessmentId,
    pub child: ChildSnapshot,
    pub examiner_id: String,
    pub recorded_on: NaiveDate,
    pub outcome: AssessmentOutcome,
    pub answers: AnswerSheet,
    pub artifact: Option<ArtifactReference>,
}

impl AssessmentRecord {
    pub fn status(&self) -> AssessmentStatus {
        if self.artifact.is_some() {
            AssessmentStatus::Final
        } else {
            AssessmentStatus::Recorded
        }
    }

    pub fn status_view(&self) -> AssessmentStatusView {
        AssessmentStatusView {
            assessment_id: self.assessment_id.clone(),
            child_id: self.child.child_id.clone(),
            status: self.status().label(),
            quotient: self.outcome.quotient,
            grade: self.outcome.grade.label(),
            artifact: self.artifact.clone(),
        }
    }
}

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Insert and artifact attachment are the two halves of one logical write:
/// readers going through `latest_final_for_child` must never observe a
/// record whose artifact has not landed.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, record: AssessmentRecord) -> Result<AssessmentRecord, RepositoryError>;
    fn attach_artifact(
        &self,
        id: &AssessmentId,
        artifact: ArtifactReference,
    ) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &AssessmentId) -> Result<Option<AssessmentRecord>, RepositoryError>;
    fn latest_final_for_child(
        &self,
        child_id: &ChildId,
    ) -> Result<Option<AssessmentRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Boundary to the document renderer that produces report artifacts. The
/// rendering itself (PDF layout, storage) lives outside this crate.
pub trait ArtifactStore: Send + Sync {
    fn generate(&self, record: &AssessmentRecord) -> Result<ArtifactReference, ArtifactError>;
}

/// Artifact generation error.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("artifact generation failed: {0}")]
    Generation(String),
}

/// Sanitized representation of an assessment's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentStatusView {
    pub assessment_id: AssessmentId,
    pub child_id: ChildId,
    pub status: &'static str,
    pub quotient: f64,
    pub grade: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactReference>,
}
