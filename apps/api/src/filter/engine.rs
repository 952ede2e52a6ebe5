//! Filter Engine: conjunctive evaluation of every dimension over a record set.
//!
//! A record is kept iff it passes every dimension's predicate. Output keeps the
//! input order. Records are never mutated; callers get a new collection.

use crate::filter::predicates;
use crate::filter::state::{FilterState, SearchScope};
use crate::models::ResumeRecord;

/// A `FilterState` prepared for repeated evaluation: the search term is
/// lowercased once instead of per record.
struct Matcher<'s> {
    state: &'s FilterState,
    needle: Option<String>,
}

impl<'s> Matcher<'s> {
    fn new(state: &'s FilterState) -> Self {
        let needle = state
            .filename
            .is_active()
            .then(|| state.filename.term.to_lowercase());
        Self { state, needle }
    }

    /// Scalar checks first, skill scans last.
    fn matches(&self, record: &ResumeRecord) -> bool {
        let s = self.state;
        predicates::status(record, &s.status)
            && predicates::categorical(record.experience_level.as_deref(), &s.experience_level)
            && predicates::categorical(record.career_trajectory.as_deref(), &s.career_trajectory)
            && predicates::score(record.ats_score(), &s.ats_score)
            && predicates::score(record.job_match(), &s.job_match)
            && predicates::date_range(record, &s.date_range)
            && self.matches_text(record)
            && predicates::contains_all(record.technical_skills(), &s.technical_skills)
            && predicates::contains_all(record.soft_skills(), &s.soft_skills)
            && predicates::contains_all(record.domain_skills(), &s.domain_skills)
    }

    fn matches_text(&self, record: &ResumeRecord) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        if predicates::text_contains(&record.filename, needle) {
            return true;
        }
        match self.state.filename.scope {
            SearchScope::Filename => false,
            SearchScope::FilenameAndSkills => record
                .technical_skills()
                .iter()
                .chain(record.domain_skills())
                .any(|skill| predicates::text_contains(skill, needle)),
        }
    }
}

/// Whether a single record passes every active dimension of `state`.
pub fn matches(record: &ResumeRecord, state: &FilterState) -> bool {
    Matcher::new(state).matches(record)
}

/// Borrowing variant of [`apply_filters`].
pub fn filter_refs<'a>(records: &'a [ResumeRecord], state: &FilterState) -> Vec<&'a ResumeRecord> {
    let matcher = Matcher::new(state);
    records.iter().filter(|r| matcher.matches(r)).collect()
}

/// Stable filter: the subset of `records` passing `state`, in input order.
pub fn apply_filters(records: &[ResumeRecord], state: &FilterState) -> Vec<ResumeRecord> {
    filter_refs(records, state).into_iter().cloned().collect()
}
