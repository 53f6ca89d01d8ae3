use serde::{Deserialize, Serialize};

use super::super::calendar::round_to_tenth;
use super::super::domain::{DomainScores, Grade, DOMAIN_COUNT};
use super::config::GradeThresholds;
use super::ScoreError;

/// Per-domain quotients plus the aggregate developmental quotient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuotientBreakdown {
    pub domain_quotients: [f64; DOMAIN_COUNT],
    pub aggregate: f64,
}

/// Quotients are mental age over chronological age, as a percentage rounded
/// to one decimal. A zero (or negative) age is an input error, not an
/// infinity.
pub(crate) fn derive_quotients(
    scores: &DomainScores,
    month_age: f64,
) -> Result<QuotientBreakdown, ScoreError> {
    if month_age <= 0.0 {
        return Err(ScoreError::ZeroAge);
    }

    let mut domain_quotients = [0.0; DOMAIN_COUNT];
    for (slot, score) in domain_quotients.iter_mut().zip(scores.0.iter()) {
        *slot = round_to_tenth(score / month_age * 100.0);
    }
    let aggregate = round_to_tenth(scores.average() / month_age * 100.0);

    Ok(QuotientBreakdown {
        domain_quotients,
        aggregate,
    })
}

/// Thresholds are inclusive lower bounds: exactly 130 is still Good and
/// exactly 70 is still BorderlineLow.
pub(crate) fn classify(quotient: f64, thresholds: &GradeThresholds) -> Grade {
    if quotient > thresholds.excellent_over {
        Grade::Excellent
    } else if quotient >= thresholds.good_floor {
        Grade::Good
    } else if quotient >= thresholds.average_floor {
        Grade::Average
    } else if quotient >= thresholds.borderline_floor {
        Grade::BorderlineLow
    } else {
        Grade::DevelopmentalDelay
    }
}
