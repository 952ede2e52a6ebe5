use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Processing state of a resume analysis as reported by the upstream service.
///
/// Deserializes through `FromStr`, so `Unknown` is never accepted from a client.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String")]
pub enum AnalysisStatus {
    Completed,
    Processing,
    Failed,
    /// Any status string the upstream sends that is not one of the above.
    #[default]
    Unknown,
}

impl AnalysisStatus {
    /// The statuses a user can select, in display order.
    pub const SELECTABLE: [AnalysisStatus; 3] = [
        AnalysisStatus::Completed,
        AnalysisStatus::Processing,
        AnalysisStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisStatus::Completed => "Completed",
            AnalysisStatus::Processing => "Processing",
            AnalysisStatus::Failed => "Failed",
            AnalysisStatus::Unknown => "Unknown",
        }
    }

    /// Maps an upstream status string, falling back to `Unknown`.
    pub fn from_upstream(raw: &str) -> Self {
        raw.parse().unwrap_or(AnalysisStatus::Unknown)
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AnalysisStatus::SELECTABLE
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| s.to_string())
    }
}

impl TryFrom<String> for AnalysisStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .parse()
            .map_err(|raw| format!("unknown analysis status '{raw}'"))
    }
}

/// One resume analysis result as served by the upstream analysis service.
///
/// Deserialization is lenient: a field with the wrong JSON type is read as
/// absent instead of rejecting the whole record. Fields this service does not
/// filter on are kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    #[serde(default, alias = "analysisId", deserialize_with = "lenient_id")]
    pub analysis_id: String,
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: AnalysisStatus,
    #[serde(default, deserialize_with = "lenient_text")]
    pub filename: String,
    #[serde(default, alias = "processDate", deserialize_with = "lenient_opt_text")]
    pub process_date: Option<String>,
    #[serde(default, alias = "experienceLevel", deserialize_with = "lenient_opt_text")]
    pub experience_level: Option<String>,
    #[serde(default, alias = "technicalSkills", deserialize_with = "lenient_string_list")]
    pub technical_skills: Option<Vec<String>>,
    #[serde(default, alias = "softSkills", deserialize_with = "lenient_string_list")]
    pub soft_skills: Option<Vec<String>>,
    #[serde(default, alias = "domainSkills", deserialize_with = "lenient_string_list")]
    pub domain_skills: Option<Vec<String>>,
    #[serde(default, alias = "atsCompatibilityScore", deserialize_with = "lenient_number")]
    pub ats_compatibility_score: Option<f64>,
    #[serde(default, alias = "jobMatchPercentage", deserialize_with = "lenient_number")]
    pub job_match_percentage: Option<f64>,
    #[serde(default, alias = "careerTrajectory", deserialize_with = "lenient_opt_text")]
    pub career_trajectory: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeRecord {
    pub fn technical_skills(&self) -> &[String] {
        self.technical_skills.as_deref().unwrap_or_default()
    }

    pub fn soft_skills(&self) -> &[String] {
        self.soft_skills.as_deref().unwrap_or_default()
    }

    pub fn domain_skills(&self) -> &[String] {
        self.domain_skills.as_deref().unwrap_or_default()
    }

    /// ATS compatibility score, absent = 0.
    pub fn ats_score(&self) -> f64 {
        self.ats_compatibility_score.unwrap_or(0.0)
    }

    /// Job match percentage, absent = 0.
    pub fn job_match(&self) -> f64 {
        self.job_match_percentage.unwrap_or(0.0)
    }

    /// Calendar day of `process_date`, or `None` when absent or unparseable.
    pub fn process_day(&self) -> Option<NaiveDate> {
        self.process_date.as_deref().and_then(parse_calendar_day)
    }
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses the timestamp shapes the upstream emits into a calendar day.
///
/// Offset-bearing timestamps keep the day as written in their own offset.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
// ────────────────────────────────────────────────────────────────────────────

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(d: D) -> Result<AnalysisStatus, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => AnalysisStatus::from_upstream(&s),
        _ => AnalysisStatus::Unknown,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_opt_text(d)?.unwrap_or_default())
}

fn lenient_opt_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(match Option::<Value>::deserialize(d)? {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    })
}
