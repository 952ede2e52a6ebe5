//! Dataset summary for the dashboard view: totals by status, recent activity
//! and the most common technical skills.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::models::{AnalysisStatus, ResumeRecord};

/// Days (inclusive of today) counted as "recent".
pub const RECENT_WINDOW_DAYS: i64 = 30;
pub const TOP_SKILLS_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: AnalysisStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
    pub recent_count: usize,
    pub top_skills: Vec<SkillCount>,
}

pub fn compute_stats(records: &[ResumeRecord], today: NaiveDate) -> DatasetStats {
    let window_start = today - Duration::days(RECENT_WINDOW_DAYS - 1);

    let mut by_status: BTreeMap<AnalysisStatus, usize> = BTreeMap::new();
    let mut skill_counts: HashMap<&str, usize> = HashMap::new();
    let mut recent_count = 0;

    for record in records {
        *by_status.entry(record.status).or_default() += 1;
        if record
            .process_day()
            .is_some_and(|day| window_start <= day && day <= today)
        {
            recent_count += 1;
        }
        for skill in record.technical_skills() {
            *skill_counts.entry(skill.as_str()).or_default() += 1;
        }
    }

    let mut top_skills: Vec<SkillCount> = skill_counts
        .into_iter()
        .map(|(skill, count)| SkillCount {
            skill: skill.to_string(),
            count,
        })
        .collect();
    top_skills.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    top_skills.truncate(TOP_SKILLS_LIMIT);

    DatasetStats {
        total: records.len(),
        by_status: by_status
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect(),
        recent_count,
        top_skills,
    }
}
