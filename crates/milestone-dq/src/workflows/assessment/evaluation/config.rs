use serde::{Deserialize, Serialize};

use super::super::domain::{DevelopmentalDomain, DOMAIN_COUNT};
use super::super::schedule::BracketSchedule;

/// Contiguous run of brackets sharing one mental-age weight: a fully passed
/// bracket in the band is worth `months_per_bracket` months.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatioBand {
    pub from_month: u32,
    pub to_month: u32,
    pub months_per_bracket: f64,
}

impl RatioBand {
    pub const fn covers(&self, month: u32) -> bool {
        self.from_month <= month && month <= self.to_month
    }
}

/// The instrument's bands: monthly brackets weigh 1 month, quarterly
/// brackets 3, half-year brackets 6.
pub fn standard_bands() -> Vec<RatioBand> {
    vec![
        RatioBand {
            from_month: 1,
            to_month: 12,
            months_per_bracket: 1.0,
        },
        RatioBand {
            from_month: 15,
            to_month: 36,
            months_per_bracket: 3.0,
        },
        RatioBand {
            from_month: 42,
            to_month: 84,
            months_per_bracket: 6.0,
        },
    ]
}

/// Normalization divisors: how many items compose each (domain, bracket)
/// cell, indexed by domain and bracket position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCountTable {
    counts: [Vec<u32>; DOMAIN_COUNT],
}

impl ItemCountTable {
    pub fn new(counts: [Vec<u32>; DOMAIN_COUNT]) -> Self {
        Self { counts }
    }

    /// Item counts of the published instrument, aligned with the standard
    /// 28-bracket schedule.
    pub fn standard() -> Self {
        Self::new([
            vec![
                2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 1, 2, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2,
                2,
            ],
            vec![
                2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 1, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
                2,
            ],
            vec![
                2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
                2,
            ],
            vec![
                2, 2, 1, 2, 1, 2, 1, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2,
                2,
            ],
            vec![
                2, 2, 2, 2, 2, 2, 2, 1, 1, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2,
                2,
            ],
        ])
    }

    /// Divisor for a cell; absent and zero counts are indistinguishable
    /// from the scorer's point of view, both are reported as missing.
    pub fn count(&self, domain: DevelopmentalDomain, bracket_index: usize) -> Option<u32> {
        self.counts[domain.index()]
            .get(bracket_index)
            .copied()
            .filter(|&count| count > 0)
    }
}

/// Inclusive lower bounds for each grade band; quotients above
/// `excellent_over` grade out of the table's top.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradeThresholds {
    pub excellent_over: f64,
    pub good_floor: f64,
    pub average_floor: f64,
    pub borderline_floor: f64,
}

impl GradeThresholds {
    pub const fn standard() -> Self {
        Self {
            excellent_over: 130.0,
            good_floor: 110.0,
            average_floor: 80.0,
            borderline_floor: 70.0,
        }
    }
}

/// Lookup tables driving the scoring engine. Loaded once at startup and
/// injected; nothing in the engine reads ambient globals, so tests can
/// substitute alternate tables freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub schedule: BracketSchedule,
    pub bands: Vec<RatioBand>,
    pub item_counts: ItemCountTable,
    pub thresholds: GradeThresholds,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringConfig {
    pub fn standard() -> Self {
        Self {
            schedule: BracketSchedule::standard(),
            bands: standard_bands(),
            item_counts: ItemCountTable::standard(),
            thresholds: GradeThresholds::standard(),
        }
    }

    pub fn band_ratio(&self, month: u32) -> Option<f64> {
        self.bands
            .iter()
            .find(|band| band.covers(month))
            .map(|band| band.months_per_bracket)
    }
}
