//! FilterState: one typed field per filter dimension.
//!
//! Every dimension has an explicit default that means "no constraint":
//! an empty selection, an empty search term, no date range, or the full
//! `[0, 100]` score span. `is_active` and the engine's vacuous-true branches
//! both key off that same default.

use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::AnalysisStatus;

pub const SCORE_MIN: f64 = 0.0;
pub const SCORE_MAX: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("invalid score range [{min}, {max}]: bounds must lie within [0, 100] with min <= max")]
    InvalidScoreRange { min: f64, max: f64 },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("unknown filter dimension '{0}'")]
    UnknownDimension(String),

    #[error("filter dimension '{0}' does not hold a set of values")]
    NotMultiValued(FilterDimension),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),
}

// ────────────────────────────────────────────────────────────────────────────
// Dimension names
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Status,
    Filename,
    DateRange,
    ExperienceLevel,
    TechnicalSkills,
    SoftSkills,
    DomainSkills,
    AtsScore,
    JobMatch,
    CareerTrajectory,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 10] = [
        FilterDimension::Status,
        FilterDimension::Filename,
        FilterDimension::DateRange,
        FilterDimension::ExperienceLevel,
        FilterDimension::TechnicalSkills,
        FilterDimension::SoftSkills,
        FilterDimension::DomainSkills,
        FilterDimension::AtsScore,
        FilterDimension::JobMatch,
        FilterDimension::CareerTrajectory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterDimension::Status => "status",
            FilterDimension::Filename => "filename",
            FilterDimension::DateRange => "date_range",
            FilterDimension::ExperienceLevel => "experience_level",
            FilterDimension::TechnicalSkills => "technical_skills",
            FilterDimension::SoftSkills => "soft_skills",
            FilterDimension::DomainSkills => "domain_skills",
            FilterDimension::AtsScore => "ats_score",
            FilterDimension::JobMatch => "job_match",
            FilterDimension::CareerTrajectory => "career_trajectory",
        }
    }
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterDimension {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterDimension::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| FilterError::UnknownDimension(s.to_string()))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Dimension value types
// ────────────────────────────────────────────────────────────────────────────

/// Multi-select value set. Empty = no constraint, never "match nothing".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection<T: Ord>(BTreeSet<T>);

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Selection(BTreeSet::new())
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Selection(iter.into_iter().collect())
    }
}

impl<T: Ord> Selection<T> {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.0.contains(value)
    }

    /// Returns true if the value was selected.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.0.remove(value)
    }
}

/// Which record text fields a search term is matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    Filename,
    /// Filename, technical skill names and domain skill names.
    FilenameAndSkills,
}

/// Free-text search. An empty term is inactive whatever the scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextQuery {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub scope: SearchScope,
}

impl TextQuery {
    #[cfg(test)]
    pub fn new(term: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            term: term.into(),
            scope,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }
}

/// Inclusive calendar-day range. `None` = no constraint.
///
/// Serialized as `null` or `["YYYY-MM-DD", "YYYY-MM-DD"]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Option<[NaiveDate; 2]>", into = "Option<[NaiveDate; 2]>")]
pub struct DateRange(Option<(NaiveDate, NaiveDate)>);

impl DateRange {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Result<Self, FilterError> {
        if start > end {
            return Err(FilterError::InvalidDateRange { start, end });
        }
        Ok(DateRange(Some((start, end))))
    }

    pub fn bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.0
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

impl TryFrom<Option<[NaiveDate; 2]>> for DateRange {
    type Error = FilterError;

    fn try_from(value: Option<[NaiveDate; 2]>) -> Result<Self, Self::Error> {
        match value {
            Some([start, end]) => DateRange::between(start, end),
            None => Ok(DateRange::default()),
        }
    }
}

impl From<DateRange> for Option<[NaiveDate; 2]> {
    fn from(range: DateRange) -> Self {
        range.0.map(|(start, end)| [start, end])
    }
}

/// Closed numeric range inside `[SCORE_MIN, SCORE_MAX]`.
///
/// Serialized as `[min, max]`. The default is the full span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ScoreRange {
    min: f64,
    max: f64,
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: SCORE_MIN,
            max: SCORE_MAX,
        }
    }
}

impl ScoreRange {
    pub fn new(min: f64, max: f64) -> Result<Self, FilterError> {
        let in_bounds = |v: f64| v.is_finite() && (SCORE_MIN..=SCORE_MAX).contains(&v);
        if !in_bounds(min) || !in_bounds(max) || min > max {
            return Err(FilterError::InvalidScoreRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Narrower than the full span.
    pub fn is_active(&self) -> bool {
        self.min > SCORE_MIN || self.max < SCORE_MAX
    }
}

impl TryFrom<[f64; 2]> for ScoreRange {
    type Error = FilterError;

    fn try_from([min, max]: [f64; 2]) -> Result<Self, Self::Error> {
        ScoreRange::new(min, max)
    }
}

impl From<ScoreRange> for [f64; 2] {
    fn from(range: ScoreRange) -> Self {
        [range.min, range.max]
    }
}

// ────────────────────────────────────────────────────────────────────────────
// FilterState and its mutations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub status: Selection<AnalysisStatus>,
    pub filename: TextQuery,
    pub date_range: DateRange,
    pub experience_level: Selection<String>,
    pub technical_skills: Selection<String>,
    pub soft_skills: Selection<String>,
    pub domain_skills: Selection<String>,
    pub ats_score: ScoreRange,
    pub job_match: ScoreRange,
    pub career_trajectory: Selection<String>,
}

/// Replaces exactly one dimension with a complete new value.
///
/// Wire form: `{"dimension": "technical_skills", "value": ["Rust"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum FilterUpdate {
    Status(Selection<AnalysisStatus>),
    Filename(TextQuery),
    DateRange(DateRange),
    ExperienceLevel(Selection<String>),
    TechnicalSkills(Selection<String>),
    SoftSkills(Selection<String>),
    DomainSkills(Selection<String>),
    AtsScore(ScoreRange),
    JobMatch(ScoreRange),
    CareerTrajectory(Selection<String>),
}

impl FilterUpdate {
    pub fn dimension(&self) -> FilterDimension {
        match self {
            FilterUpdate::Status(_) => FilterDimension::Status,
            FilterUpdate::Filename(_) => FilterDimension::Filename,
            FilterUpdate::DateRange(_) => FilterDimension::DateRange,
            FilterUpdate::ExperienceLevel(_) => FilterDimension::ExperienceLevel,
            FilterUpdate::TechnicalSkills(_) => FilterDimension::TechnicalSkills,
            FilterUpdate::SoftSkills(_) => FilterDimension::SoftSkills,
            FilterUpdate::DomainSkills(_) => FilterDimension::DomainSkills,
            FilterUpdate::AtsScore(_) => FilterDimension::AtsScore,
            FilterUpdate::JobMatch(_) => FilterDimension::JobMatch,
            FilterUpdate::CareerTrajectory(_) => FilterDimension::CareerTrajectory,
        }
    }
}

impl FilterState {
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Status(v) => self.status = v,
            FilterUpdate::Filename(v) => self.filename = v,
            FilterUpdate::DateRange(v) => self.date_range = v,
            FilterUpdate::ExperienceLevel(v) => self.experience_level = v,
            FilterUpdate::TechnicalSkills(v) => self.technical_skills = v,
            FilterUpdate::SoftSkills(v) => self.soft_skills = v,
            FilterUpdate::DomainSkills(v) => self.domain_skills = v,
            FilterUpdate::AtsScore(v) => self.ats_score = v,
            FilterUpdate::JobMatch(v) => self.job_match = v,
            FilterUpdate::CareerTrajectory(v) => self.career_trajectory = v,
        }
    }

    /// Restores one dimension to its default.
    pub fn clear(&mut self, dimension: FilterDimension) {
        match dimension {
            FilterDimension::Status => self.status = Selection::default(),
            FilterDimension::Filename => self.filename = TextQuery::default(),
            FilterDimension::DateRange => self.date_range = DateRange::default(),
            FilterDimension::ExperienceLevel => self.experience_level = Selection::default(),
            FilterDimension::TechnicalSkills => self.technical_skills = Selection::default(),
            FilterDimension::SoftSkills => self.soft_skills = Selection::default(),
            FilterDimension::DomainSkills => self.domain_skills = Selection::default(),
            FilterDimension::AtsScore => self.ats_score = ScoreRange::default(),
            FilterDimension::JobMatch => self.job_match = ScoreRange::default(),
            FilterDimension::CareerTrajectory => self.career_trajectory = Selection::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    /// Removes one value from a multi-valued dimension, leaving every other
    /// dimension untouched. Returns whether the value was selected.
    pub fn remove_value(
        &mut self,
        dimension: FilterDimension,
        value: &str,
    ) -> Result<bool, FilterError> {
        let removed = match dimension {
            FilterDimension::Status => {
                let status: AnalysisStatus = value
                    .parse()
                    .map_err(FilterError::UnknownStatus)?;
                self.status.remove(&status)
            }
            FilterDimension::ExperienceLevel => self.experience_level.remove(value),
            FilterDimension::TechnicalSkills => self.technical_skills.remove(value),
            FilterDimension::SoftSkills => self.soft_skills.remove(value),
            FilterDimension::DomainSkills => self.domain_skills.remove(value),
            FilterDimension::CareerTrajectory => self.career_trajectory.remove(value),
            FilterDimension::Filename
            | FilterDimension::DateRange
            | FilterDimension::AtsScore
            | FilterDimension::JobMatch => return Err(FilterError::NotMultiValued(dimension)),
        };
        Ok(removed)
    }

    pub fn is_active(&self, dimension: FilterDimension) -> bool {
        match dimension {
            FilterDimension::Status => !self.status.is_empty(),
            FilterDimension::Filename => self.filename.is_active(),
            FilterDimension::DateRange => self.date_range.is_active(),
            FilterDimension::ExperienceLevel => !self.experience_level.is_empty(),
            FilterDimension::TechnicalSkills => !self.technical_skills.is_empty(),
            FilterDimension::SoftSkills => !self.soft_skills.is_empty(),
            FilterDimension::DomainSkills => !self.domain_skills.is_empty(),
            FilterDimension::AtsScore => self.ats_score.is_active(),
            FilterDimension::JobMatch => self.job_match.is_active(),
            FilterDimension::CareerTrajectory => !self.career_trajectory.is_empty(),
        }
    }

    pub fn active_dimensions(&self) -> Vec<FilterDimension> {
        FilterDimension::ALL
            .into_iter()
            .filter(|d| self.is_active(*d))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        FilterDimension::ALL
            .into_iter()
            .filter(|d| self.is_active(*d))
            .count()
    }
}
