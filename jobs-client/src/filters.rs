//! Filter state behind the search form. Pure data, no I/O.
//!
//! Mutations here never start a search on their own; the orchestrator only
//! reads the state when it receives an explicit event.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use time::{Duration, OffsetDateTime, UtcOffset};

use jobs_core::{
    EmploymentType, ExperienceLevel, JobFunction, Language, Province, SearchCriteria, WorkMode,
};

/// Relative creation-date window. `Any` means no date constraint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DatePreset {
    #[default]
    Any,
    PastDay,
    PastWeek,
    PastMonth,
}

impl DatePreset {
    pub fn label(&self) -> &'static str {
        match self {
            DatePreset::Any => "Any time",
            DatePreset::PastDay => "Past 24 hours",
            DatePreset::PastWeek => "Past week",
            DatePreset::PastMonth => "Past month",
        }
    }

    fn window(self) -> Option<Duration> {
        match self {
            DatePreset::Any => None,
            DatePreset::PastDay => Some(Duration::days(1)),
            DatePreset::PastWeek => Some(Duration::weeks(1)),
            DatePreset::PastMonth => Some(Duration::days(30)),
        }
    }

    /// Lower bound of the window ending at `now`, truncated to the start of
    /// the UTC hour so repeated searches within the hour share a criteria key.
    pub fn created_from(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        let from = (now - self.window()?).to_offset(UtcOffset::UTC);
        Some(
            from.replace_minute(0)
                .and_then(|t| t.replace_second(0))
                .and_then(|t| t.replace_nanosecond(0))
                .unwrap_or(from),
        )
    }
}

/// Filters that hold a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum MultiSelectKey {
    ExperienceLevel,
    EmploymentType,
    WorkMode,
    Province,
    JobFunction,
    Company,
}

/// Filters that hold exactly one value with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum SingleSelectKey {
    Language,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Multi(MultiSelectKey),
    Single(SingleSelectKey),
}

impl From<MultiSelectKey> for FilterKey {
    fn from(key: MultiSelectKey) -> Self {
        FilterKey::Multi(key)
    }
}

impl From<SingleSelectKey> for FilterKey {
    fn from(key: SingleSelectKey) -> Self {
        FilterKey::Single(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("'{value}' is not a valid value for filter '{key}'")]
    InvalidValue { key: String, value: String },
}

/// Raised before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreconditionError {
    #[error("search query must not be empty")]
    EmptyQuery,
}

/// Draft query text plus every filter selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    query: String,
    experience_levels: BTreeSet<ExperienceLevel>,
    employment_types: BTreeSet<EmploymentType>,
    work_modes: BTreeSet<WorkMode>,
    provinces: BTreeSet<Province>,
    job_functions: BTreeSet<JobFunction>,
    companies: BTreeSet<String>,
    language: Language,
    date: DatePreset,
}

fn toggle_in<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    if !set.remove(&value) {
        set.insert(value);
    }
}

fn parse_value<T: FromStr>(key: impl ToString, value: &str) -> Result<T, FilterError> {
    value.trim().parse().map_err(|_| FilterError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn wire_values<T: AsRef<str>>(set: &BTreeSet<T>) -> Vec<String> {
    let mut values: Vec<String> = set.iter().map(|v| v.as_ref().to_string()).collect();
    values.sort();
    values
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn date(&self) -> DatePreset {
        self.date
    }

    /// Adds `value` when absent, removes it when present. An invalid value
    /// leaves the state untouched.
    pub fn toggle(&mut self, key: MultiSelectKey, value: &str) -> Result<(), FilterError> {
        match key {
            MultiSelectKey::ExperienceLevel => {
                toggle_in(&mut self.experience_levels, parse_value(key, value)?)
            }
            MultiSelectKey::EmploymentType => {
                toggle_in(&mut self.employment_types, parse_value(key, value)?)
            }
            MultiSelectKey::WorkMode => toggle_in(&mut self.work_modes, parse_value(key, value)?),
            MultiSelectKey::Province => toggle_in(&mut self.provinces, parse_value(key, value)?),
            MultiSelectKey::JobFunction => {
                toggle_in(&mut self.job_functions, parse_value(key, value)?)
            }
            MultiSelectKey::Company => {
                // The URL form joins names with commas, so a name holding one
                // could never be restored from a link.
                let name = value.trim();
                if name.is_empty() || name.contains(',') {
                    return Err(FilterError::InvalidValue {
                        key: key.to_string(),
                        value: value.to_string(),
                    });
                }
                toggle_in(&mut self.companies, name.to_string());
            }
        }
        Ok(())
    }

    pub fn set_single(&mut self, key: SingleSelectKey, value: &str) -> Result<(), FilterError> {
        match key {
            SingleSelectKey::Language => self.language = parse_value(key, value)?,
            SingleSelectKey::Date => self.date = parse_value(key, value)?,
        }
        Ok(())
    }

    pub fn clear(&mut self, key: impl Into<FilterKey>) {
        match key.into() {
            FilterKey::Multi(MultiSelectKey::ExperienceLevel) => self.experience_levels.clear(),
            FilterKey::Multi(MultiSelectKey::EmploymentType) => self.employment_types.clear(),
            FilterKey::Multi(MultiSelectKey::WorkMode) => self.work_modes.clear(),
            FilterKey::Multi(MultiSelectKey::Province) => self.provinces.clear(),
            FilterKey::Multi(MultiSelectKey::JobFunction) => self.job_functions.clear(),
            FilterKey::Multi(MultiSelectKey::Company) => self.companies.clear(),
            FilterKey::Single(SingleSelectKey::Language) => self.language = Language::default(),
            FilterKey::Single(SingleSelectKey::Date) => self.date = DatePreset::default(),
        }
    }

    pub fn clear_all(&mut self, preserve_query: bool) {
        let query = std::mem::take(&mut self.query);
        *self = Self::default();
        if preserve_query {
            self.query = query;
        }
    }

    /// Set size for multi-selects; 0 or 1 for single-selects, where the
    /// default value counts as inactive.
    pub fn active_count(&self, key: impl Into<FilterKey>) -> usize {
        match key.into() {
            FilterKey::Multi(MultiSelectKey::ExperienceLevel) => self.experience_levels.len(),
            FilterKey::Multi(MultiSelectKey::EmploymentType) => self.employment_types.len(),
            FilterKey::Multi(MultiSelectKey::WorkMode) => self.work_modes.len(),
            FilterKey::Multi(MultiSelectKey::Province) => self.provinces.len(),
            FilterKey::Multi(MultiSelectKey::JobFunction) => self.job_functions.len(),
            FilterKey::Multi(MultiSelectKey::Company) => self.companies.len(),
            FilterKey::Single(SingleSelectKey::Language) => {
                usize::from(self.language != Language::default())
            }
            FilterKey::Single(SingleSelectKey::Date) => {
                usize::from(self.date != DatePreset::default())
            }
        }
    }

    pub fn total_active(&self) -> usize {
        use strum::IntoEnumIterator;

        MultiSelectKey::iter()
            .map(|k| self.active_count(k))
            .chain(SingleSelectKey::iter().map(|k| self.active_count(k)))
            .sum()
    }

    /// Selected values of `key` as sorted wire strings.
    pub fn values(&self, key: MultiSelectKey) -> Vec<String> {
        match key {
            MultiSelectKey::ExperienceLevel => wire_values(&self.experience_levels),
            MultiSelectKey::EmploymentType => wire_values(&self.employment_types),
            MultiSelectKey::WorkMode => wire_values(&self.work_modes),
            MultiSelectKey::Province => wire_values(&self.provinces),
            MultiSelectKey::JobFunction => wire_values(&self.job_functions),
            MultiSelectKey::Company => wire_values(&self.companies),
        }
    }

    pub fn is_selected(&self, key: MultiSelectKey, value: &str) -> bool {
        self.values(key).iter().any(|v| v == value.trim())
    }

    /// Canonical form: the query trimmed.
    pub fn normalized(&self) -> Self {
        let mut state = self.clone();
        state.query = state.query.trim().to_string();
        state
    }

    /// Builds request criteria: empty filters are omitted and the date
    /// preset is resolved against `now`.
    pub fn to_criteria(
        &self,
        page: u32,
        page_size: u32,
        now: OffsetDateTime,
    ) -> Result<SearchCriteria, PreconditionError> {
        let query = self.query.trim();
        if query.is_empty() {
            return Err(PreconditionError::EmptyQuery);
        }

        let criteria = SearchCriteria {
            language: self.language,
            experience_levels: self.experience_levels.iter().copied().collect(),
            employment_types: self.employment_types.iter().copied().collect(),
            work_modes: self.work_modes.iter().copied().collect(),
            provinces: self.provinces.iter().copied().collect(),
            job_functions: self.job_functions.iter().copied().collect(),
            companies: self.companies.iter().cloned().collect(),
            created_from: self.date.created_from(now),
            created_to: None,
            ..SearchCriteria::new(query)
        };

        Ok(criteria
            .with_page(page.max(1))
            .with_page_size(page_size)
            .normalized())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;
    use time::macros::datetime;

    fn sample_value(key: MultiSelectKey) -> &'static str {
        match key {
            MultiSelectKey::ExperienceLevel => "senior",
            MultiSelectKey::EmploymentType => "full-time",
            MultiSelectKey::WorkMode => "remote",
            MultiSelectKey::Province => "san-jose",
            MultiSelectKey::JobFunction => "engineering",
            MultiSelectKey::Company => "Acme",
        }
    }

    #[test]
    fn toggle_twice_restores_every_key() {
        let mut base = FilterState::new();
        base.toggle(MultiSelectKey::Province, "heredia").unwrap();

        for key in MultiSelectKey::iter() {
            let mut state = base.clone();
            state.toggle(key, sample_value(key)).unwrap();
            assert_eq!(state.active_count(key), base.active_count(key) + 1);
            state.toggle(key, sample_value(key)).unwrap();
            assert_eq!(state, base, "toggle is not an involution for {key}");
        }
    }

    #[test]
    fn invalid_value_is_rejected_without_change() {
        let mut state = FilterState::new();
        let err = state.toggle(MultiSelectKey::WorkMode, "moon").unwrap_err();
        assert_eq!(
            err,
            FilterError::InvalidValue {
                key: "work-mode".to_string(),
                value: "moon".to_string()
            }
        );
        assert!(state.toggle(MultiSelectKey::Company, "   ").is_err());
        assert!(state.set_single(SingleSelectKey::Language, "klingon").is_err());
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn default_single_selects_are_inactive() {
        let mut state = FilterState::new();
        assert_eq!(state.active_count(SingleSelectKey::Language), 0);
        assert_eq!(state.active_count(SingleSelectKey::Date), 0);

        state.set_single(SingleSelectKey::Date, "past-week").unwrap();
        state.set_single(SingleSelectKey::Language, "spanish").unwrap();
        assert_eq!(state.active_count(SingleSelectKey::Date), 1);
        assert_eq!(state.active_count(SingleSelectKey::Language), 1);

        state.set_single(SingleSelectKey::Date, "any").unwrap();
        assert_eq!(state.active_count(SingleSelectKey::Date), 0);
    }

    #[test]
    fn total_active_sums_all_keys() {
        let mut state = FilterState::new();
        state.toggle(MultiSelectKey::Province, "heredia").unwrap();
        state.toggle(MultiSelectKey::Province, "limon").unwrap();
        state.toggle(MultiSelectKey::Company, "Acme").unwrap();
        state.set_single(SingleSelectKey::Date, "past-day").unwrap();
        assert_eq!(state.total_active(), 4);

        state.clear(MultiSelectKey::Province);
        assert_eq!(state.total_active(), 2);
    }

    #[test]
    fn clear_all_optionally_keeps_query() {
        let mut state = FilterState::new();
        state.set_query("rust");
        state.toggle(MultiSelectKey::WorkMode, "remote").unwrap();

        let mut kept = state.clone();
        kept.clear_all(true);
        assert_eq!(kept.query(), "rust");
        assert_eq!(kept.total_active(), 0);

        state.clear_all(false);
        assert_eq!(state, FilterState::new());
    }

    #[test]
    fn to_criteria_requires_query() {
        let mut state = FilterState::new();
        state.set_query("   ");
        assert_eq!(
            state.to_criteria(1, 20, OffsetDateTime::now_utc()),
            Err(PreconditionError::EmptyQuery)
        );
    }

    #[test]
    fn to_criteria_carries_selection_and_resolves_date() {
        let now = datetime!(2024-06-10 14:37:12 UTC);
        let mut state = FilterState::new();
        state.set_query("  rust engineer ");
        state.toggle(MultiSelectKey::Province, "heredia").unwrap();
        state.toggle(MultiSelectKey::Province, "san-jose").unwrap();
        state.toggle(MultiSelectKey::Company, " Acme ").unwrap();
        state.set_single(SingleSelectKey::Date, "past-week").unwrap();

        let criteria = state.to_criteria(0, 25, now).unwrap();
        assert_eq!(criteria.query, "rust engineer");
        assert_eq!(criteria.page, 1);
        assert_eq!(criteria.page_size, 25);
        assert_eq!(criteria.provinces, vec![Province::SanJose, Province::Heredia]);
        assert_eq!(criteria.companies, vec!["Acme".to_string()]);
        assert!(criteria.work_modes.is_empty());
        assert_eq!(criteria.created_from, Some(datetime!(2024-06-03 14:00:00 UTC)));
        assert_eq!(criteria.created_to, None);
    }

    #[test]
    fn date_key_is_stable_within_the_hour() {
        let mut state = FilterState::new();
        state.set_query("rust");
        state.set_single(SingleSelectKey::Date, "past-day").unwrap();

        let a = state.to_criteria(1, 20, datetime!(2024-06-10 14:01:00 UTC)).unwrap();
        let b = state.to_criteria(1, 20, datetime!(2024-06-10 14:59:59 UTC)).unwrap();
        let c = state.to_criteria(1, 20, datetime!(2024-06-10 15:00:00 UTC)).unwrap();
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn any_date_sets_no_bound() {
        assert_eq!(DatePreset::Any.created_from(OffsetDateTime::now_utc()), None);
    }

    #[test]
    fn company_names_with_commas_are_rejected() {
        let mut state = FilterState::new();
        state.set_query("rust");
        state.toggle(MultiSelectKey::Company, "Globex").unwrap();

        let before = state.clone();
        assert!(matches!(
            state.toggle(MultiSelectKey::Company, "Acme, Inc."),
            Err(FilterError::InvalidValue { .. })
        ));
        assert_eq!(state, before);

        let criteria = state.to_criteria(1, 20, OffsetDateTime::now_utc()).unwrap();
        assert_eq!(criteria.companies, vec!["Globex".to_string()]);
    }

    #[test]
    fn normalized_trims_query() {
        let mut state = FilterState::new();
        state.set_query(" rust ");
        assert_eq!(state.normalized().query(), "rust");
    }
}
