//! Developmental quotient assessment workflow.
//!
//! Age resolution, bracket scheduling, and scoring are pure, synchronous
//! computations with no shared mutable state; the service facade adds the
//! access guard and the two-step persist-then-attach write around them.

pub mod calendar;
pub mod domain;
pub(crate) mod evaluation;
pub mod guard;
pub mod repository;
pub mod router;
pub mod schedule;
pub mod service;

#[cfg(test)]
mod tests;

pub use calendar::{chronological_age_months, MIN_MONTH_AGE};
pub use domain::{
    AnswerEntry, AnswerSheet, AssessmentId, AssessmentStatus, AssessmentSubmission, ChildId,
    ChildSnapshot, DevelopmentalDomain, DomainScores, Grade, MilestoneItem, StepDirection,
    DOMAIN_COUNT,
};
pub use evaluation::{
    standard_bands, AssessmentOutcome, GradeThresholds, ItemCountTable, QuotientBreakdown,
    RatioBand, ScoreError, ScoringConfig, ScoringEngine,
};
pub use guard::{AccessDenied, AccessGuard, RequesterIdentity, Role};
pub use repository::{
    ArtifactError, ArtifactReference, ArtifactStore, AssessmentRecord, AssessmentRepository,
    AssessmentStatusView, RepositoryError,
};
pub use router::assessment_router;
pub use schedule::{BracketSchedule, ScheduleError, STANDARD_MONTHS};
pub use service::{
    AssessmentReportView, AssessmentService, AssessmentServiceError, DomainDetailView,
    IntakeView, ItemBrowseView, ItemResultView, EXAMINER_ROLES, REPORT_ROLES,
};
