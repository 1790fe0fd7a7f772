//! Search criteria and the normalized key used for caching and dedup.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::vocabulary::{EmploymentType, ExperienceLevel, JobFunction, Language, Province, WorkMode};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_FACET_LIMIT: u32 = 100;

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Everything a single search execution depends on.
///
/// An empty list for a multi-select filter means "no constraint", exactly as
/// if the filter were absent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    pub query: String,
    #[serde(default)]
    pub language: Language,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub experience_levels: Vec<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub employment_types: Vec<EmploymentType>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub work_modes: Vec<WorkMode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provinces: Vec<Province>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub job_functions: Vec<JobFunction>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub companies: Vec<String>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_from: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_to: Option<OffsetDateTime>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl SearchCriteria {
    /// Criteria for `query` with no filters, first page, default page size.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: Language::default(),
            experience_levels: Vec::new(),
            employment_types: Vec::new(),
            work_modes: Vec::new(),
            provinces: Vec::new(),
            job_functions: Vec::new(),
            companies: Vec::new(),
            created_from: None,
            created_to: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Canonical form: trimmed query, sorted and deduplicated filter lists,
    /// blank company names dropped, page at least 1.
    pub fn normalized(&self) -> Self {
        let mut companies: Vec<String> = self
            .companies
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        companies.sort();
        companies.dedup();

        Self {
            query: self.query.trim().to_string(),
            language: self.language,
            experience_levels: sorted(&self.experience_levels),
            employment_types: sorted(&self.employment_types),
            work_modes: sorted(&self.work_modes),
            provinces: sorted(&self.provinces),
            job_functions: sorted(&self.job_functions),
            companies,
            created_from: self.created_from,
            created_to: self.created_to,
            page: self.page.max(1),
            page_size: self.page_size,
        }
    }

    /// The same criteria with the company filter removed. Input for company
    /// facet counts.
    pub fn without_company(&self) -> Self {
        Self {
            companies: Vec::new(),
            ..self.clone()
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.max(1) - 1) * i64::from(self.page_size)
    }

    pub fn key(&self) -> CriteriaKey {
        CriteriaKey::from(self)
    }
}

fn sorted<T: Ord + Copy>(values: &[T]) -> Vec<T> {
    let mut values = values.to_vec();
    values.sort();
    values.dedup();
    values
}

/// Identity of a normalized [`SearchCriteria`]. Two criteria share a key
/// exactly when their normalized forms are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CriteriaKey(String);

impl CriteriaKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CriteriaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&SearchCriteria> for CriteriaKey {
    fn from(criteria: &SearchCriteria) -> Self {
        fn join<T: AsRef<str>>(values: &[T]) -> String {
            values.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
        }

        fn instant(value: Option<OffsetDateTime>) -> String {
            value
                .map(|t| t.unix_timestamp_nanos().to_string())
                .unwrap_or_default()
        }

        let c = criteria.normalized();
        // Query and company names are length-prefixed so separators inside
        // them cannot collide with the field layout.
        let companies = c
            .companies
            .iter()
            .map(|name| format!("{}:{}", name.len(), name))
            .collect::<String>();

        Self(format!(
            "q={}:{}|lang={}|exp={}|type={}|mode={}|prov={}|func={}|company={}|from={}|to={}|p={}|size={}",
            c.query.len(),
            c.query,
            c.language,
            join(&c.experience_levels),
            join(&c.employment_types),
            join(&c.work_modes),
            join(&c.provinces),
            join(&c.job_functions),
            companies,
            instant(c.created_from),
            instant(c.created_to),
            c.page,
            c.page_size,
        ))
    }
}
