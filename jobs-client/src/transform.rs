//! Search rows reshaped for display.

use serde::Serialize;
use time::OffsetDateTime;

use jobs_core::JobRow;

/// A job ready to render: arrays never null, enums as labels, and a relative
/// posted date.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayJob {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub title: String,
    pub description: Option<String>,
    pub responsibilities: Vec<String>,
    pub must_have_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub main_technologies: Vec<String>,
    pub benefits: Vec<String>,
    pub experience_level: Option<&'static str>,
    pub employment_type: Option<&'static str>,
    pub location: Option<&'static str>,
    pub province: Option<&'static str>,
    pub work_mode: Option<&'static str>,
    pub job_function: Option<&'static str>,
    pub language: Option<&'static str>,
    pub application_url: Option<String>,
    pub posted: String,
}

pub fn transform(row: &JobRow, now: OffsetDateTime) -> DisplayJob {
    DisplayJob {
        id: row.id,
        company_id: row.company_id,
        company_name: row.company_name.clone(),
        title: row.title.clone(),
        description: row.description.clone(),
        responsibilities: row.responsibilities.clone().unwrap_or_default(),
        must_have_skills: row.must_have_skills.clone().unwrap_or_default(),
        nice_to_have_skills: row.nice_to_have_skills.clone().unwrap_or_default(),
        main_technologies: row.main_technologies.clone().unwrap_or_default(),
        benefits: row.benefits.clone().unwrap_or_default(),
        experience_level: row.experience_level.map(|v| v.label()),
        employment_type: row.employment_type.map(|v| v.label()),
        location: row.location.map(|v| v.label()),
        province: row.province.map(|v| v.label()),
        work_mode: row.work_mode.map(|v| v.label()),
        job_function: row.job_function.map(|v| v.label()),
        language: row.language.map(|v| v.label()),
        application_url: row.application_url.clone(),
        posted: posted_label(row.created_at, now),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

/// "3 hours ago" style label. `None` (an unreadable timestamp) gives
/// "unknown"; anything in the future or under a minute old is "just now".
pub fn posted_label(created_at: Option<OffsetDateTime>, now: OffsetDateTime) -> String {
    let Some(created_at) = created_at else {
        return "unknown".to_string();
    };

    let elapsed = now - created_at;
    if elapsed.is_negative() || elapsed.whole_minutes() < 1 {
        return "just now".to_string();
    }
    if elapsed.whole_hours() < 1 {
        return plural(elapsed.whole_minutes(), "minute");
    }
    if elapsed.whole_days() < 1 {
        return plural(elapsed.whole_hours(), "hour");
    }

    match elapsed.whole_days() {
        days @ 1..=6 => plural(days, "day"),
        7..=13 => "1 week ago".to_string(),
        days @ 14..=29 => plural(days / 7, "week"),
        30..=59 => "1 month ago".to_string(),
        days => plural(days / 30, "month"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_core::{Province, WorkMode};
    use time::macros::datetime;
    use time::Duration;

    const NOW: OffsetDateTime = datetime!(2024-06-10 12:00:00 UTC);

    fn ago(d: Duration) -> String {
        posted_label(Some(NOW - d), NOW)
    }

    #[test]
    fn documented_scenarios() {
        assert_eq!(ago(Duration::seconds(90)), "1 minute ago");
        assert_eq!(ago(Duration::hours(25)), "1 day ago");
        assert_eq!(ago(Duration::days(10)), "1 week ago");
        assert_eq!(ago(Duration::seconds(-5)), "just now");
    }

    #[test]
    fn breakpoints() {
        assert_eq!(ago(Duration::seconds(59)), "just now");
        assert_eq!(ago(Duration::minutes(59)), "59 minutes ago");
        assert_eq!(ago(Duration::minutes(60)), "1 hour ago");
        assert_eq!(ago(Duration::hours(23)), "23 hours ago");
        assert_eq!(ago(Duration::days(6)), "6 days ago");
        assert_eq!(ago(Duration::days(7)), "1 week ago");
        assert_eq!(ago(Duration::days(14)), "2 weeks ago");
        assert_eq!(ago(Duration::days(29)), "4 weeks ago");
        assert_eq!(ago(Duration::days(30)), "1 month ago");
        assert_eq!(ago(Duration::days(59)), "1 month ago");
        assert_eq!(ago(Duration::days(60)), "2 months ago");
        assert_eq!(ago(Duration::days(400)), "13 months ago");
    }

    #[test]
    fn missing_timestamp_is_unknown() {
        assert_eq!(posted_label(None, NOW), "unknown");
    }

    #[test]
    fn unparseable_timestamp_in_payload_is_unknown() {
        let row: JobRow = serde_json::from_value(serde_json::json!({
            "id": 1,
            "companyId": 2,
            "companyName": "Acme",
            "title": "Engineer",
            "createdAt": "last tuesday",
            "relevance": 0.5
        }))
        .unwrap();

        assert_eq!(transform(&row, NOW).posted, "unknown");
    }

    #[test]
    fn null_arrays_become_empty_and_enums_become_labels() {
        let row: JobRow = serde_json::from_value(serde_json::json!({
            "id": 1,
            "companyId": 2,
            "companyName": "Acme",
            "title": "Engineer",
            "mustHaveSkills": ["Rust"],
            "benefits": null,
            "province": "san-jose",
            "workMode": "remote",
            "createdAt": "2024-06-10T09:00:00Z",
            "relevance": 0.5
        }))
        .unwrap();

        let job = transform(&row, NOW);
        assert_eq!(job.must_have_skills, vec!["Rust".to_string()]);
        assert!(job.benefits.is_empty());
        assert!(job.responsibilities.is_empty());
        assert_eq!(job.province, Some(Province::SanJose.label()));
        assert_eq!(job.work_mode, Some(WorkMode::Remote.label()));
        assert_eq!(job.posted, "3 hours ago");
    }
}
