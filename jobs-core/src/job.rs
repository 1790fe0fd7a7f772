//! Job and company records, and the row shape returned by a search.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::vocabulary::{
    EmploymentType, ExperienceLevel, JobFunction, Language, Location, Province, WorkMode,
};

/// A job posting as stored. Read-only from the search side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub id: i64,
    pub company_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub must_have_skills: Option<Vec<String>>,
    pub nice_to_have_skills: Option<Vec<String>>,
    pub main_technologies: Option<Vec<String>>,
    pub benefits: Option<Vec<String>>,
    pub experience_level: Option<ExperienceLevel>,
    pub employment_type: Option<EmploymentType>,
    pub location: Option<Location>,
    pub province: Option<Province>,
    pub work_mode: Option<WorkMode>,
    pub job_function: Option<JobFunction>,
    /// Missing language means the primary language.
    pub language: Option<Language>,
    pub application_url: Option<String>,
    pub is_active: bool,
    /// Ingest-side dedup key; carried through untouched.
    pub signature: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl JobRecord {
    pub fn effective_language(&self) -> Language {
        self.language.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyRecord {
    pub id: i64,
    pub name: String,
    pub is_active: bool,
}

/// One ranked search hit with its company name denormalized.
///
/// Timestamps deserialize leniently: a value that is not RFC 3339 becomes
/// `None` instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub responsibilities: Option<Vec<String>>,
    #[serde(default)]
    pub must_have_skills: Option<Vec<String>>,
    #[serde(default)]
    pub nice_to_have_skills: Option<Vec<String>>,
    #[serde(default)]
    pub main_technologies: Option<Vec<String>>,
    #[serde(default)]
    pub benefits: Option<Vec<String>>,
    #[serde(default)]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default)]
    pub employment_type: Option<EmploymentType>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub province: Option<Province>,
    #[serde(default)]
    pub work_mode: Option<WorkMode>,
    #[serde(default)]
    pub job_function: Option<JobFunction>,
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub application_url: Option<String>,
    #[serde(default, with = "lenient_rfc3339")]
    pub created_at: Option<OffsetDateTime>,
    #[serde(default, with = "lenient_rfc3339")]
    pub updated_at: Option<OffsetDateTime>,
    /// Weighted lexical rank of the match. Informational only, results are
    /// ordered by recency.
    #[serde(default)]
    pub relevance: f32,
}

impl JobRow {
    pub fn from_record(record: &JobRecord, company_name: impl Into<String>, relevance: f32) -> Self {
        Self {
            id: record.id,
            company_id: record.company_id,
            company_name: company_name.into(),
            title: record.title.clone(),
            description: record.description.clone(),
            responsibilities: record.responsibilities.clone(),
            must_have_skills: record.must_have_skills.clone(),
            nice_to_have_skills: record.nice_to_have_skills.clone(),
            main_technologies: record.main_technologies.clone(),
            benefits: record.benefits.clone(),
            experience_level: record.experience_level,
            employment_type: record.employment_type,
            location: record.location,
            province: record.province,
            work_mode: record.work_mode,
            job_function: record.job_function,
            language: record.language,
            application_url: record.application_url.clone(),
            created_at: Some(record.created_at),
            updated_at: Some(record.updated_at),
            relevance,
        }
    }
}

mod lenient_rfc3339 {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::format_description::well_known::Rfc3339;
    use time::OffsetDateTime;

    pub fn serialize<S>(value: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        time::serde::rfc3339::option::serialize(value, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| OffsetDateTime::parse(s.trim(), &Rfc3339).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row_json(created_at: serde_json::Value) -> serde_json::Value {
        json!({
            "id": 7,
            "companyId": 3,
            "companyName": "Acme",
            "title": "Backend Engineer",
            "mustHaveSkills": null,
            "createdAt": created_at,
        })
    }

    #[test]
    fn unparseable_timestamp_becomes_none() {
        let row: JobRow = serde_json::from_value(row_json(json!("yesterday-ish"))).unwrap();
        assert_eq!(row.created_at, None);
        assert_eq!(row.must_have_skills, None);
    }

    #[test]
    fn rfc3339_timestamp_is_parsed() {
        let row: JobRow =
            serde_json::from_value(row_json(json!("2024-05-01T10:00:00Z"))).unwrap();
        assert_eq!(row.created_at.map(|t| t.unix_timestamp()), Some(1_714_557_600));
        assert_eq!(row.updated_at, None);
    }

    #[test]
    fn effective_language_defaults_to_english() {
        let record = JobRecord {
            id: 1,
            company_id: 1,
            title: "Engineer".to_string(),
            description: None,
            responsibilities: None,
            must_have_skills: None,
            nice_to_have_skills: None,
            main_technologies: None,
            benefits: None,
            experience_level: None,
            employment_type: None,
            location: None,
            province: None,
            work_mode: None,
            job_function: None,
            language: None,
            application_url: None,
            is_active: true,
            signature: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        };
        assert_eq!(record.effective_language(), Language::English);
    }
}
