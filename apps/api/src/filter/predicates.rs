//! One predicate per dimension kind. Each returns true when its dimension is
//! at its default, whatever the record holds.

use crate::filter::state::{DateRange, ScoreRange, Selection};
use crate::models::{AnalysisStatus, ResumeRecord};

/// `Unknown` never satisfies an active selection.
pub fn status(record: &ResumeRecord, selected: &Selection<AnalysisStatus>) -> bool {
    selected.is_empty()
        || (record.status != AnalysisStatus::Unknown && selected.contains(&record.status))
}

/// Exact match of an optional categorical value. Absent fails an active selection.
pub fn categorical(value: Option<&str>, selected: &Selection<String>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

/// Always evaluated: the default `[0, 100]` span admits every valid score.
pub fn score(value: f64, range: &ScoreRange) -> bool {
    range.contains(value)
}

/// Missing or unparseable dates fail an active range.
pub fn date_range(record: &ResumeRecord, range: &DateRange) -> bool {
    match range.bounds() {
        None => true,
        Some((start, end)) => record
            .process_day()
            .is_some_and(|day| start <= day && day <= end),
    }
}

/// "Must contain all": every selected skill has to appear in `skills`.
pub fn contains_all(skills: &[String], selected: &Selection<String>) -> bool {
    selected
        .iter()
        .all(|wanted| skills.iter().any(|have| have == wanted))
}

/// Case-insensitive substring test. `needle` must already be lowercased.
pub fn text_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
