use serde::{Deserialize, Serialize};

use super::domain::StepDirection;

/// Month checkpoints at which a distinct milestone item set is administered:
/// monthly through the first year, then at widening intervals to 84 months.
pub const STANDARD_MONTHS: [u32; 28] = [
    1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 18, 21, 24, 27, 30, 33, 36, 42, 48, 54, 60, 66,
    72, 78, 84,
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("bracket schedule requires at least one entry")]
    Empty,
    #[error("bracket months must be strictly increasing")]
    NotAscending,
    #[error("month age {0} is not an evaluation bracket")]
    UnknownBracket(u32),
}

/// Ordered evaluation brackets with floor-style resolution and directional
/// stepping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSchedule {
    months: Vec<u32>,
}

impl Default for BracketSchedule {
    fn default() -> Self {
        Self::standard()
    }
}

impl BracketSchedule {
    pub fn standard() -> Self {
        Self {
            months: STANDARD_MONTHS.to_vec(),
        }
    }

    pub fn new(months: Vec<u32>) -> Result<Self, ScheduleError> {
        if months.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if months.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(ScheduleError::NotAscending);
        }
        Ok(Self { months })
    }

    pub fn months(&self) -> &[u32] {
        &self.months
    }

    pub fn first(&self) -> u32 {
        self.months[0]
    }

    pub fn last(&self) -> u32 {
        self.months[self.months.len() - 1]
    }

    pub fn index_of(&self, bracket: u32) -> Option<usize> {
        self.months.iter().position(|&month| month == bracket)
    }

    pub fn contains(&self, bracket: u32) -> bool {
        self.index_of(bracket).is_some()
    }

    /// Bracket applicable to a fractional month age: the exact entry when
    /// the age matches one, otherwise the greatest entry below the age.
    /// Ages beyond either end clamp to the nearest entry.
    pub fn resolve(&self, month_age: f64) -> u32 {
        let mut resolved = self.first();
        for &month in &self.months {
            if f64::from(month) <= month_age {
                resolved = month;
            } else {
                break;
            }
        }
        resolved
    }

    /// Adjacent bracket in the given direction, staying put at either end.
    /// `bracket` must be an entry of the schedule.
    pub fn step(&self, bracket: u32, direction: StepDirection) -> Result<u32, ScheduleError> {
        let index = self
            .index_of(bracket)
            .ok_or(ScheduleError::UnknownBracket(bracket))?;
        let stepped = match direction {
            StepDirection::Forward => (index + 1).min(self.months.len() - 1),
            StepDirection::Backward => index.saturating_sub(1),
        };
        Ok(self.months[stepped])
    }
}
