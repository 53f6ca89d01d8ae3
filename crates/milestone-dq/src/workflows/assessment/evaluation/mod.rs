mod config;
mod policy;
mod rules;

pub use config::{standard_bands, GradeThresholds, ItemCountTable, RatioBand, ScoringConfig};
pub use policy::QuotientBreakdown;

use serde::{Deserialize, Serialize};

use super::domain::{AnswerSheet, DevelopmentalDomain, DomainScores, Grade, DOMAIN_COUNT};

/// Stateless engine applying the configured lookup tables to one sitting.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Mental ages from a baseline plus an answer sheet.
    pub fn accumulate(
        &self,
        baseline: &DomainScores,
        answers: &AnswerSheet,
    ) -> Result<DomainScores, ScoreError> {
        rules::accumulate_scores(baseline, answers, &self.config)
    }

    /// Per-domain and aggregate quotients for the given chronological age.
    pub fn quotients(
        &self,
        scores: &DomainScores,
        month_age: f64,
    ) -> Result<QuotientBreakdown, ScoreError> {
        policy::derive_quotients(scores, month_age)
    }

    /// Grade label for an aggregate quotient.
    pub fn classify(&self, quotient: f64) -> Grade {
        policy::classify(quotient, &self.config.thresholds)
    }

    /// Full scoring pass: accumulate, derive quotients, classify.
    pub fn score(
        &self,
        baseline: &DomainScores,
        answers: &AnswerSheet,
        month_age: f64,
    ) -> Result<AssessmentOutcome, ScoreError> {
        let domain_scores = self.accumulate(baseline, answers)?;
        let quotients = self.quotients(&domain_scores, month_age)?;
        let grade = self.classify(quotients.aggregate);

        Ok(AssessmentOutcome {
            month_age,
            test_age: self.config.schedule.resolve(month_age),
            domain_scores,
            domain_quotients: quotients.domain_quotients,
            quotient: quotients.aggregate,
            grade,
        })
    }
}

/// Everything one scoring call produces; ownership passes to the caller,
/// persistence is someone else's concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub month_age: f64,
    pub test_age: u32,
    pub domain_scores: DomainScores,
    pub domain_quotients: [f64; DOMAIN_COUNT],
    pub quotient: f64,
    pub grade: Grade,
}

/// Input-validation failures raised while scoring. All local and
/// recoverable; the engine has no partial-failure states of its own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreError {
    #[error("month age {0} is outside the evaluation schedule")]
    InvalidBracket(u32),
    #[error("no item count configured for {domain:?} at month {month_age}")]
    MissingItemCount {
        domain: DevelopmentalDomain,
        month_age: u32,
    },
    #[error("chronological age must be greater than zero")]
    ZeroAge,
    #[error("unknown developmental domain '{0}'")]
    UnknownDomain(String),
}
