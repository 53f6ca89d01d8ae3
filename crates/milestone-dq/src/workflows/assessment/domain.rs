use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for enrolled children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChildId(pub String);

impl fmt::Display for ChildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for stored assessments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Number of developmental domains scored by the instrument.
pub const DOMAIN_COUNT: usize = 5;

/// The five developmental domains, scored independently.
///
/// Ordering is significant: it doubles as the answer-sheet and score-array
/// index, and the item bank refers to domains by 1-based sort code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum DevelopmentalDomain {
    GrossMotor,
    FineMotor,
    Language,
    Adaptability,
    Social,
}

impl DevelopmentalDomain {
    pub const ALL: [DevelopmentalDomain; DOMAIN_COUNT] = [
        DevelopmentalDomain::GrossMotor,
        DevelopmentalDomain::FineMotor,
        DevelopmentalDomain::Language,
        DevelopmentalDomain::Adaptability,
        DevelopmentalDomain::Social,
    ];

    pub const fn index(self) -> usize {
        match self {
            DevelopmentalDomain::GrossMotor => 0,
            DevelopmentalDomain::FineMotor => 1,
            DevelopmentalDomain::Language => 2,
            DevelopmentalDomain::Adaptability => 3,
            DevelopmentalDomain::Social => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// 1-based code used by the item bank export.
    pub const fn sort_code(self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn from_sort_code(code: u32) -> Option<Self> {
        if code == 0 {
            return None;
        }
        Self::from_index(code as usize - 1)
    }

    pub const fn label(self) -> &'static str {
        match self {
            DevelopmentalDomain::GrossMotor => "gross_motor",
            DevelopmentalDomain::FineMotor => "fine_motor",
            DevelopmentalDomain::Language => "language",
            DevelopmentalDomain::Adaptability => "adaptability",
            DevelopmentalDomain::Social => "social",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.label() == label)
    }
}

/// One milestone item administered at a single (domain, bracket) cell.
///
/// Read-only reference data owned by the item catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneItem {
    pub item_id: u32,
    pub domain: DevelopmentalDomain,
    pub month_age: u32,
    pub name: String,
    pub method: String,
    pub pass_criterion: String,
}

/// One pass/fail answer for one milestone item, tagged with the bracket the
/// item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEntry {
    pub item_id: u32,
    pub month_age: u32,
    pub passed: bool,
}

/// Answers grouped per domain, positionally aligned with
/// [`DevelopmentalDomain::ALL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet {
    pub answers: [Vec<AnswerEntry>; DOMAIN_COUNT],
}

impl AnswerSheet {
    pub fn for_domain(&self, domain: DevelopmentalDomain) -> &[AnswerEntry] {
        &self.answers[domain.index()]
    }

    pub fn record(&mut self, domain: DevelopmentalDomain, entry: AnswerEntry) {
        self.answers[domain.index()].push(entry);
    }

    pub fn iter(&self) -> impl Iterator<Item = (DevelopmentalDomain, &[AnswerEntry])> {
        DevelopmentalDomain::ALL
            .iter()
            .map(move |&domain| (domain, self.for_domain(domain)))
    }

    pub fn is_empty(&self) -> bool {
        self.answers.iter().all(Vec::is_empty)
    }
}

/// Per-domain mental ages in months, ordered like
/// [`DevelopmentalDomain::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainScores(pub [f64; DOMAIN_COUNT]);

impl DomainScores {
    pub const ZERO: DomainScores = DomainScores([0.0; DOMAIN_COUNT]);

    pub fn get(&self, domain: DevelopmentalDomain) -> f64 {
        self.0[domain.index()]
    }

    pub fn average(&self) -> f64 {
        self.0.iter().sum::<f64>() / DOMAIN_COUNT as f64
    }
}

/// Qualitative development grade derived from the aggregate quotient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    Good,
    Average,
    BorderlineLow,
    DevelopmentalDelay,
}

impl Grade {
    pub const fn label(self) -> &'static str {
        match self {
            Grade::Excellent => "excellent",
            Grade::Good => "good",
            Grade::Average => "average",
            Grade::BorderlineLow => "borderline_low",
            Grade::DevelopmentalDelay => "developmental_delay",
        }
    }
}

/// Direction for stepping through the bracket schedule while browsing items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepDirection {
    Forward,
    Backward,
}

/// Minimal evaluee facts carried with a submission; roster CRUD lives in
/// the records service, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildSnapshot {
    pub child_id: ChildId,
    pub name: String,
    pub birth_date: NaiveDate,
}

/// Examiner-entered sheet for one assessment sitting.
///
/// The baseline is the caller's claim about where each domain starts
/// (typically the previous sitting's scores); it is carried verbatim, never
/// recomputed or validated against history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub child: ChildSnapshot,
    pub baseline: DomainScores,
    pub answers: AnswerSheet,
}

/// Lifecycle of a stored assessment: a scored row becomes final only once
/// the report artifact reference is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentStatus {
    Recorded,
    Final,
}

impl AssessmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            AssessmentStatus::Recorded => "recorded",
            AssessmentStatus::Final => "final",
        }
    }
}
