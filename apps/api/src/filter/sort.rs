//! Optional ordering of the published view, one key per sortable table column.
//!
//! Sorting never changes which records are in the view, only their order, and
//! is stable: records comparing equal keep the engine's output order.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::models::ResumeRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Filename,
    Status,
    /// By calendar day; missing or unparseable dates sort first.
    ProcessDate,
    /// Missing levels sort first.
    ExperienceLevel,
    /// Missing scores count as 0.
    #[serde(alias = "ats_compatibility_score")]
    AtsScore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize)]
pub struct SortParams {
    pub sort: Option<SortKey>,
    #[serde(default)]
    pub order: SortOrder,
}

fn compare(a: &ResumeRecord, b: &ResumeRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Filename => a
            .filename
            .to_lowercase()
            .cmp(&b.filename.to_lowercase())
            .then_with(|| a.filename.cmp(&b.filename)),
        SortKey::Status => a.status.as_str().cmp(b.status.as_str()),
        SortKey::ProcessDate => a.process_day().cmp(&b.process_day()),
        SortKey::ExperienceLevel => a.experience_level.cmp(&b.experience_level),
        SortKey::AtsScore => a.ats_score().total_cmp(&b.ats_score()),
    }
}

pub fn sort_records(records: &mut [ResumeRecord], key: SortKey, order: SortOrder) {
    match order {
        SortOrder::Asc => records.sort_by(|a, b| compare(a, b, key)),
        SortOrder::Desc => records.sort_by(|a, b| compare(b, a, key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bare_record, ids, record};
    use crate::models::AnalysisStatus;

    fn table() -> Vec<ResumeRecord> {
        let mut b = record("b");
        b.filename = "bob.pdf".to_string();
        b.ats_compatibility_score = Some(88.0);
        b.experience_level = Some("Senior".to_string());
        b.process_date = Some("2025-03-02T10:00:00Z".to_string());

        let mut a = record("a");
        a.filename = "Alice.pdf".to_string();
        a.status = AnalysisStatus::Failed;
        a.ats_compatibility_score = Some(42.0);
        a.experience_level = Some("Junior".to_string());

        let mut c = bare_record("c");
        c.filename = "carol.docx".to_string();

        vec![b, a, c]
    }

    fn sorted(key: SortKey, order: SortOrder) -> Vec<String> {
        let mut records = table();
        sort_records(&mut records, key, order);
        ids(&records).into_iter().map(str::to_string).collect()
    }

    #[test]
    fn test_filename_sort_ignores_case() {
        assert_eq!(sorted(SortKey::Filename, SortOrder::Asc), ["a", "b", "c"]);
        assert_eq!(sorted(SortKey::Filename, SortOrder::Desc), ["c", "b", "a"]);
    }

    #[test]
    fn test_missing_values_sort_first_ascending() {
        // c has no score, no level and no date
        assert_eq!(sorted(SortKey::AtsScore, SortOrder::Asc), ["c", "a", "b"]);
        assert_eq!(sorted(SortKey::ExperienceLevel, SortOrder::Asc), ["c", "a", "b"]);
        assert_eq!(sorted(SortKey::ProcessDate, SortOrder::Asc), ["c", "a", "b"]);
    }

    #[test]
    fn test_status_sort_by_name() {
        assert_eq!(sorted(SortKey::Status, SortOrder::Asc), ["b", "a", "c"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut records = vec![record("x"), record("y"), record("z")];
        sort_records(&mut records, SortKey::AtsScore, SortOrder::Desc);
        assert_eq!(ids(&records), ["x", "y", "z"]);
    }

    #[test]
    fn test_params_wire_format() {
        let params: SortParams =
            serde_json::from_value(serde_json::json!({"sort": "ats_compatibility_score"}))
                .unwrap();
        assert_eq!(params.sort, Some(SortKey::AtsScore));
        assert_eq!(params.order, SortOrder::Asc);
    }
}
