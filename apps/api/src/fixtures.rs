//! Record builders shared by unit tests.

use serde_json::Map;

use crate::models::{AnalysisStatus, ResumeRecord};

pub fn skills(items: &[&str]) -> Option<Vec<String>> {
    Some(items.iter().map(|s| s.to_string()).collect())
}

/// A completed mid-level record with one technical skill and mid-range scores.
pub fn record(id: &str) -> ResumeRecord {
    ResumeRecord {
        analysis_id: id.to_string(),
        status: AnalysisStatus::Completed,
        filename: format!("{id}.pdf"),
        process_date: Some("2025-01-15 09:30:00".to_string()),
        experience_level: Some("Mid".to_string()),
        technical_skills: skills(&["Python"]),
        soft_skills: skills(&["Communication"]),
        domain_skills: skills(&["Healthcare"]),
        ats_compatibility_score: Some(70.0),
        job_match_percentage: Some(60.0),
        career_trajectory: Some("Steady".to_string()),
        extra: Map::new(),
    }
}

/// A record with every optional field absent.
pub fn bare_record(id: &str) -> ResumeRecord {
    ResumeRecord {
        analysis_id: id.to_string(),
        status: AnalysisStatus::Processing,
        filename: format!("{id}.docx"),
        process_date: None,
        experience_level: None,
        technical_skills: None,
        soft_skills: None,
        domain_skills: None,
        ats_compatibility_score: None,
        job_match_percentage: None,
        career_trajectory: None,
        extra: Map::new(),
    }
}

pub fn ids(records: &[ResumeRecord]) -> Vec<&str> {
    records.iter().map(|r| r.analysis_id.as_str()).collect()
}
