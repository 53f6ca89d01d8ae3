use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::calendar;
use super::domain::{
    AssessmentId, AssessmentSubmission, ChildId, ChildSnapshot, DevelopmentalDomain,
    DomainScores, Grade, MilestoneItem, StepDirection, DOMAIN_COUNT,
};
use super::evaluation::{ScoreError, ScoringConfig, ScoringEngine};
use super::guard::{AccessDenied, AccessGuard, RequesterIdentity, Role};
use super::repository::{
    ArtifactError, ArtifactReference, ArtifactStore, AssessmentRecord, AssessmentRepository,
    RepositoryError,
};
use super::schedule::ScheduleError;
use crate::workflows::catalog::ItemCatalog;

/// Roles allowed to administer and score assessments.
pub const EXAMINER_ROLES: &[Role] = &[Role::Admin, Role::Director, Role::Teacher];

/// Roles allowed to read finished reports.
pub const REPORT_ROLES: &[Role] = &[Role::Admin, Role::Director, Role::Teacher, Role::Guardian];

/// Service composing the access guard, scoring engine, item catalog, and
/// storage collaborators.
pub struct AssessmentService<R, A> {
    guard: AccessGuard,
    repository: Arc<R>,
    artifacts: Arc<A>,
    engine: Arc<ScoringEngine>,
    catalog: Arc<ItemCatalog>,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> AssessmentId {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AssessmentId(format!("dq-{id:06}"))
}

impl<R, A> AssessmentService<R, A>
where
    R: AssessmentRepository + 'static,
    A: ArtifactStore + 'static,
{
    pub fn new(
        repository: Arc<R>,
        artifacts: Arc<A>,
        catalog: Arc<ItemCatalog>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            guard: AccessGuard,
            repository,
            artifacts,
            engine: Arc::new(ScoringEngine::new(config)),
            catalog,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Current fractional month age plus the baseline to score from: the
    /// child's latest finalized domain scores, or zeros with no history.
    pub fn intake(
        &self,
        identity: &RequesterIdentity,
        child: &ChildSnapshot,
        reference_date: NaiveDate,
    ) -> Result<IntakeView, AssessmentServiceError> {
        self.guard.require(identity, EXAMINER_ROLES)?;

        let month_age = calendar::chronological_age_months(child.birth_date, reference_date);
        let baseline = self
            .repository
            .latest_final_for_child(&child.child_id)?
            .map(|record| record.outcome.domain_scores)
            .unwrap_or(DomainScores::ZERO);

        Ok(IntakeView {
            child_id: child.child_id.clone(),
            month_age,
            baseline,
        })
    }

    /// Items for one domain at the bracket resolved from `month_age`,
    /// stepping to a neighbor when the age already sits exactly on a
    /// bracket and a direction is given.
    pub fn browse_items(
        &self,
        identity: &RequesterIdentity,
        domain: DevelopmentalDomain,
        month_age: f64,
        direction: Option<StepDirection>,
    ) -> Result<ItemBrowseView, AssessmentServiceError> {
        self.guard.require(identity, EXAMINER_ROLES)?;

        let schedule = &self.engine.config().schedule;
        let resolved = schedule.resolve(month_age);
        let bracket = match direction {
            Some(direction) if f64::from(resolved) == month_age => {
                schedule.step(resolved, direction)?
            }
            _ => resolved,
        };

        Ok(ItemBrowseView {
            domain,
            month_age: bracket,
            items: self.catalog.items(domain, bracket).to_vec(),
        })
    }

    /// Score one sitting and persist it. The record insert and the artifact
    /// attachment form a single logical transaction: the record stays
    /// invisible to report readers until the artifact reference lands, and
    /// a failed attachment surfaces as a recoverable error carrying the
    /// assessment id so the caller can retry via [`Self::finalize`].
    pub fn submit(
        &self,
        identity: &RequesterIdentity,
        submission: AssessmentSubmission,
        reference_date: NaiveDate,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        self.guard.require(identity, EXAMINER_ROLES)?;

        let month_age =
            calendar::chronological_age_months(submission.child.birth_date, reference_date);
        let outcome = self
            .engine
            .score(&submission.baseline, &submission.answers, month_age)?;

        let record = AssessmentRecord {
            assessment_id: next_assessment_id(),
            child: submission.child,
            examiner_id: identity.user_id.clone(),
            recorded_on: reference_date,
            outcome,
            answers: submission.answers,
            artifact: None,
        };
        let mut stored = self.repository.insert(record)?;

        let artifact = match self.artifacts.generate(&stored) {
            Ok(artifact) => artifact,
            Err(source) => {
                return Err(AssessmentServiceError::Artifact {
                    assessment_id: stored.assessment_id,
                    source,
                })
            }
        };
        self.repository
            .attach_artifact(&stored.assessment_id, artifact.clone())?;
        stored.artifact = Some(artifact);

        info!(
            assessment_id = %stored.assessment_id,
            quotient = stored.outcome.quotient,
            grade = stored.outcome.grade.label(),
            "assessment finalized"
        );
        Ok(stored)
    }

    /// Retry artifact generation for a record whose first attachment
    /// failed. Already-final records pass through unchanged.
    pub fn finalize(
        &self,
        identity: &RequesterIdentity,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentRecord, AssessmentServiceError> {
        self.guard.require(identity, EXAMINER_ROLES)?;

        let mut record = self
            .repository
            .fetch(assessment_id)?
            .ok_or(RepositoryError::NotFound)?;

        if record.artifact.is_none() {
            let artifact = match self.artifacts.generate(&record) {
                Ok(artifact) => artifact,
                Err(source) => {
                    return Err(AssessmentServiceError::Artifact {
                        assessment_id: record.assessment_id,
                        source,
                    })
                }
            };
            self.repository.attach_artifact(assessment_id, artifact.clone())?;
            record.artifact = Some(artifact);
            info!(assessment_id = %record.assessment_id, "assessment finalized on retry");
        }

        Ok(record)
    }

    /// Full report for a finalized assessment. Records still waiting on
    /// their artifact are not visible here.
    pub fn report(
        &self,
        identity: &RequesterIdentity,
        assessment_id: &AssessmentId,
    ) -> Result<AssessmentReportView, AssessmentServiceError> {
        self.guard.require(identity, REPORT_ROLES)?;

        let record = self
            .repository
            .fetch(assessment_id)?
            .filter(|record| record.artifact.is_some())
            .ok_or(RepositoryError::NotFound)?;

        Ok(report_view(&record, &self.catalog))
    }
}

fn report_view(record: &AssessmentRecord, catalog: &ItemCatalog) -> AssessmentReportView {
    let domains = DevelopmentalDomain::ALL
        .iter()
        .map(|&domain| {
            let items = record
                .answers
                .for_domain(domain)
                .iter()
                .map(|entry| {
                    let name = catalog
                        .items(domain, entry.month_age)
                        .iter()
                        .find(|item| item.item_id == entry.item_id)
                        .map(|item| item.name.clone())
                        .unwrap_or_default();
                    ItemResultView {
                        item_id: entry.item_id,
                        month_age: entry.month_age,
                        name,
                        passed: entry.passed,
                    }
                })
                .collect();

            DomainDetailView {
                domain,
                score: record.outcome.domain_scores.get(domain),
                quotient: record.outcome.domain_quotients[domain.index()],
                items,
            }
        })
        .collect();

    AssessmentReportView {
        assessment_id: record.assessment_id.clone(),
        child: record.child.clone(),
        examiner_id: record.examiner_id.clone(),
        recorded_on: record.recorded_on,
        month_age: record.outcome.month_age,
        test_age: record.outcome.test_age,
        domain_scores: record.outcome.domain_scores,
        mean_score: calendar::round_to_tenth(record.outcome.domain_scores.average()),
        domain_quotients: record.outcome.domain_quotients,
        quotient: record.outcome.quotient,
        grade: record.outcome.grade,
        artifact: record.artifact.clone(),
        domains,
    }
}

/// Month age plus starting scores for a new sitting.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeView {
    pub child_id: ChildId,
    pub month_age: f64,
    pub baseline: DomainScores,
}

/// Items shown while an examiner pages through the schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ItemBrowseView {
    pub domain: DevelopmentalDomain,
    pub month_age: u32,
    pub items: Vec<MilestoneItem>,
}

/// One administered item in a report's per-domain breakdown.
#[derive(Debug, Clone, Serialize)]
pub struct ItemResultView {
    pub item_id: u32,
    pub month_age: u32,
    pub name: String,
    pub passed: bool,
}

/// Per-domain slice of a report: score, quotient, and administered items.
#[derive(Debug, Clone, Serialize)]
pub struct DomainDetailView {
    pub domain: DevelopmentalDomain,
    pub score: f64,
    pub quotient: f64,
    pub items: Vec<ItemResultView>,
}

/// Full report payload for a finalized assessment.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReportView {
    pub assessment_id: AssessmentId,
    pub child: ChildSnapshot,
    pub examiner_id: String,
    pub recorded_on: NaiveDate,
    pub month_age: f64,
    pub test_age: u32,
    pub domain_scores: DomainScores,
    pub mean_score: f64,
    pub domain_quotients: [f64; DOMAIN_COUNT],
    pub quotient: f64,
    pub grade: Grade,
    pub artifact: Option<ArtifactReference>,
    pub domains: Vec<DomainDetailView>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Access(#[from] AccessDenied),
    #[error(transparent)]
    Score(#[from] ScoreError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("assessment {assessment_id} recorded but report artifact failed: {source}")]
    Artifact {
        assessment_id: AssessmentId,
        source: ArtifactError,
    },
}
