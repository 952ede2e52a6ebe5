//! Option Extractor: the selectable values for each categorical dimension,
//! drawn from the full (unfiltered) dataset.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::{AnalysisStatus, ResumeRecord};

/// Distinct values per categorical dimension, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    pub statuses: Vec<AnalysisStatus>,
    pub experience_levels: Vec<String>,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub domain_skills: Vec<String>,
    pub career_trajectories: Vec<String>,
}

/// Scans every record once. Absent skill lists and empty categorical strings
/// contribute nothing.
pub fn derive_options(records: &[ResumeRecord]) -> FilterOptions {
    let mut statuses = BTreeSet::new();
    let mut experience_levels = BTreeSet::new();
    let mut technical_skills = BTreeSet::new();
    let mut soft_skills = BTreeSet::new();
    let mut domain_skills = BTreeSet::new();
    let mut career_trajectories = BTreeSet::new();

    for record in records {
        if record.status != AnalysisStatus::Unknown {
            statuses.insert(record.status);
        }
        if let Some(level) = non_empty(&record.experience_level) {
            experience_levels.insert(level);
        }
        if let Some(trajectory) = non_empty(&record.career_trajectory) {
            career_trajectories.insert(trajectory);
        }
        technical_skills.extend(record.technical_skills().iter().map(String::as_str));
        soft_skills.extend(record.soft_skills().iter().map(String::as_str));
        domain_skills.extend(record.domain_skills().iter().map(String::as_str));
    }

    FilterOptions {
        statuses: statuses.into_iter().collect(),
        experience_levels: owned(experience_levels),
        technical_skills: owned(technical_skills),
        soft_skills: owned(soft_skills),
        domain_skills: owned(domain_skills),
        career_trajectories: owned(career_trajectories),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn owned(values: BTreeSet<&str>) -> Vec<String> {
    values.into_iter().map(str::to_string).collect()
}
