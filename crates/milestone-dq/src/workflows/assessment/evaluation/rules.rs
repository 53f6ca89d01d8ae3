use super::super::domain::{AnswerSheet, DomainScores};
use super::config::ScoringConfig;
use super::ScoreError;

/// Fold an answer sheet into per-domain mental ages on top of the
/// caller-supplied baseline.
///
/// Each pass contributes the bracket band's weight divided by the cell's
/// item count, so a fully passed bracket always adds exactly the band
/// weight no matter how many items compose it.
pub(crate) fn accumulate_scores(
    baseline: &DomainScores,
    answers: &AnswerSheet,
    config: &ScoringConfig,
) -> Result<DomainScores, ScoreError> {
    let mut scores = baseline.0;

    for (domain, entries) in answers.iter() {
        for entry in entries {
            let bracket_index = config
                .schedule
                .index_of(entry.month_age)
                .ok_or(ScoreError::InvalidBracket(entry.month_age))?;
            let ratio = config
                .band_ratio(entry.month_age)
                .ok_or(ScoreError::InvalidBracket(entry.month_age))?;
            let count = config
                .item_counts
                .count(domain, bracket_index)
                .ok_or(ScoreError::MissingItemCount {
                    domain,
                    month_age: entry.month_age,
                })?;

            if entry.passed {
                scores[domain.index()] += ratio / f64::from(count);
            }
        }
    }

    Ok(DomainScores(scores))
}
