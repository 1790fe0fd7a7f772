//! In-memory repository used by tests and the `memory` backend.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use jobs_core::{
    CompanyRecord, FacetCount, JobRecord, JobRow, SearchCriteria, SearchError, SearchResultPage,
};

use crate::domain::search::lexical::SearchDocument;
use crate::domain::search::query::LexicalQuery;
use crate::domain::search::traits::{JobRepository, Result};

/// Companies and jobs to load into a [`MemoryJobRepository`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub companies: Vec<CompanyRecord>,
    #[serde(default)]
    pub jobs: Vec<JobRecord>,
}

struct IndexedJob {
    record: JobRecord,
    document: SearchDocument,
}

#[derive(Default)]
struct Store {
    companies: HashMap<i64, CompanyRecord>,
    jobs: BTreeMap<i64, IndexedJob>,
}

/// Job store backed by in-memory maps, indexed with the same analyzers the
/// database text search configurations use.
///
/// # Examples
///
/// ```ignore
/// let repo = MemoryJobRepository::new()
///     .with_companies(vec![acme])
///     .with_jobs(vec![job]);
/// ```
#[derive(Clone, Default)]
pub struct MemoryJobRepository {
    store: Arc<RwLock<Store>>,
}

#[allow(dead_code)]
impl MemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: Seed) -> Self {
        Self::new().with_companies(seed.companies).with_jobs(seed.jobs)
    }

    pub fn with_companies(self, companies: Vec<CompanyRecord>) -> Self {
        for company in companies {
            self.upsert_company(company);
        }
        self
    }

    pub fn with_jobs(self, jobs: Vec<JobRecord>) -> Self {
        for job in jobs {
            self.upsert_job(job);
        }
        self
    }

    pub fn upsert_company(&self, company: CompanyRecord) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        store.companies.insert(company.id, company);
    }

    /// Stores a job and recomputes its search document under the same lock,
    /// so readers never see a row whose document is out of date.
    pub fn upsert_job(&self, job: JobRecord) {
        let mut store = self.store.write().unwrap_or_else(|e| e.into_inner());
        let document = match store.jobs.get(&job.id) {
            Some(existing) if !affects_document(&existing.record, &job) => {
                existing.document.clone()
            }
            _ => SearchDocument::for_job(&job),
        };
        store.jobs.insert(job.id, IndexedJob { record: job, document });
    }

    pub fn len(&self) -> usize {
        self.read().jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().jobs.is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Store> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }
}

fn affects_document(old: &JobRecord, new: &JobRecord) -> bool {
    old.title != new.title
        || old.must_have_skills != new.must_have_skills
        || old.nice_to_have_skills != new.nice_to_have_skills
        || old.language != new.language
}

/// Empty selection means no constraint.
fn any_of<T: PartialEq>(selected: &[T], value: Option<&T>) -> bool {
    selected.is_empty() || value.is_some_and(|v| selected.contains(v))
}

impl Store {
    /// Jobs matching `criteria` with their company name and rank, newest
    /// first, ties broken by id descending.
    fn matching(
        &self,
        criteria: &SearchCriteria,
        apply_company_filter: bool,
    ) -> Vec<(&JobRecord, &str, f32)> {
        let query = LexicalQuery::parse(&criteria.query, criteria.language);
        if query.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(&JobRecord, &str, f32)> = self
            .jobs
            .values()
            .filter_map(|indexed| {
                let job = &indexed.record;
                let company = self.companies.get(&job.company_id)?;
                if !job.is_active || !company.is_active {
                    return None;
                }
                if job.effective_language() != criteria.language {
                    return None;
                }
                if !query.matches(&indexed.document) {
                    return None;
                }

                let filters_match = any_of(&criteria.experience_levels, job.experience_level.as_ref())
                    && any_of(&criteria.employment_types, job.employment_type.as_ref())
                    && any_of(&criteria.work_modes, job.work_mode.as_ref())
                    && any_of(&criteria.provinces, job.province.as_ref())
                    && any_of(&criteria.job_functions, job.job_function.as_ref())
                    && (!apply_company_filter
                        || any_of(&criteria.companies, Some(&company.name)))
                    && criteria.created_from.map_or(true, |from| job.created_at >= from)
                    && criteria.created_to.map_or(true, |to| job.created_at <= to);
                if !filters_match {
                    return None;
                }

                Some((job, company.name.as_str(), query.rank(&indexed.document)))
            })
            .collect();

        hits.sort_by(|(a, _, _), (b, _, _)| {
            b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
        });
        hits
    }
}

#[async_trait]
impl JobRepository for MemoryJobRepository {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage> {
        let store = self.read();
        let hits = store.matching(criteria, true);

        let total = hits.len() as i64;
        let offset = usize::try_from(criteria.offset())
            .map_err(|_| SearchError::validation("offset out of range"))?;
        let rows = hits
            .into_iter()
            .skip(offset)
            .take(criteria.page_size as usize)
            .map(|(job, company, rank)| JobRow::from_record(job, company, rank))
            .collect();

        Ok(SearchResultPage::new(
            rows,
            total,
            criteria.limit(),
            criteria.offset(),
        ))
    }

    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: i64,
    ) -> Result<Vec<FacetCount>> {
        let store = self.read();
        let mut counts: HashMap<&str, i64> = HashMap::new();
        for (_, company, _) in store.matching(criteria, false) {
            *counts.entry(company).or_default() += 1;
        }

        let mut facets: Vec<FacetCount> = counts
            .into_iter()
            .map(|(name, job_count)| FacetCount {
                company_name: name.to_string(),
                job_count,
            })
            .collect();
        facets.sort_by(|a, b| {
            b.job_count
                .cmp(&a.job_count)
                .then_with(|| a.company_name.cmp(&b.company_name))
        });
        facets.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));

        Ok(facets)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{company, job};
    use super::*;
    use jobs_core::{Language, Province, WorkMode};

    fn titles(page: &SearchResultPage) -> Vec<&str> {
        page.rows.iter().map(|r| r.title.as_str()).collect()
    }

    #[tokio::test]
    async fn orders_by_recency_then_id() {
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![
                job(1, 1, "Engineer A", 10),
                job(2, 1, "Engineer B", 1),
                job(3, 1, "Engineer C", 10),
            ]);

        let page = repo.search(&SearchCriteria::new("engineer")).await.unwrap();
        assert_eq!(titles(&page), ["Engineer B", "Engineer C", "Engineer A"]);
        assert_eq!(page.total, 3);
        assert!(!page.has_more);
    }

    #[tokio::test]
    async fn excludes_inactive_jobs_companies_and_other_languages() {
        let mut inactive = job(2, 1, "Inactive Engineer", 0);
        inactive.is_active = false;
        let mut spanish = job(3, 1, "Engineer", 0);
        spanish.language = Some(Language::Spanish);

        let repo = MemoryJobRepository::new()
            .with_companies(vec![
                company(1, "Acme"),
                CompanyRecord {
                    is_active: false,
                    ..company(2, "Gone")
                },
            ])
            .with_jobs(vec![
                job(1, 1, "Engineer", 0),
                inactive,
                spanish,
                job(4, 2, "Engineer at closed company", 0),
                job(5, 99, "Engineer without company", 0),
            ]);

        let page = repo.search(&SearchCriteria::new("engineer")).await.unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, 1);
        assert_eq!(page.rows[0].company_name, "Acme");
    }

    #[tokio::test]
    async fn missing_language_counts_as_english() {
        let mut untagged = job(1, 1, "Engineer", 0);
        untagged.language = None;
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![untagged]);

        let page = repo.search(&SearchCriteria::new("engineer")).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn paginates_with_total_for_whole_result() {
        let jobs = (1..=5).map(|id| job(id, 1, "Engineer", id)).collect();
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(jobs);

        let criteria = SearchCriteria::new("engineer").with_page_size(2).with_page(2);
        let page = repo.search(&criteria).await.unwrap();
        assert_eq!(page.rows.iter().map(|r| r.id).collect::<Vec<_>>(), [3, 4]);
        assert_eq!(page.total, 5);
        assert_eq!(page.offset, 2);
        assert!(page.has_more);

        let last = repo.search(&criteria.clone().with_page(3)).await.unwrap();
        assert_eq!(last.rows.len(), 1);
        assert!(!last.has_more);
    }

    #[tokio::test]
    async fn province_filter_is_or_within_and_across_filters() {
        let mut sj_remote = job(1, 1, "Engineer", 0);
        sj_remote.province = Some(Province::SanJose);
        sj_remote.work_mode = Some(WorkMode::Remote);
        let mut heredia_onsite = job(2, 1, "Engineer", 1);
        heredia_onsite.province = Some(Province::Heredia);
        heredia_onsite.work_mode = Some(WorkMode::Onsite);
        let mut limon_remote = job(3, 1, "Engineer", 2);
        limon_remote.province = Some(Province::Limon);
        limon_remote.work_mode = Some(WorkMode::Remote);

        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![sj_remote, heredia_onsite, limon_remote]);

        let either = SearchCriteria {
            provinces: vec![Province::SanJose, Province::Heredia],
            ..SearchCriteria::new("engineer")
        };
        let page = repo.search(&either).await.unwrap();
        assert_eq!(page.rows.iter().map(|r| r.id).collect::<Vec<_>>(), [1, 2]);

        let both = SearchCriteria {
            work_modes: vec![WorkMode::Remote],
            ..either
        };
        let page = repo.search(&both).await.unwrap();
        assert_eq!(page.rows.iter().map(|r| r.id).collect::<Vec<_>>(), [1]);
    }

    #[tokio::test]
    async fn empty_filter_list_equals_absent_filter() {
        let mut remote = job(1, 1, "Engineer", 0);
        remote.work_mode = Some(WorkMode::Remote);
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![remote, job(2, 1, "Engineer", 1)]);

        let absent = repo.search(&SearchCriteria::new("engineer")).await.unwrap();
        let empty = repo
            .search(&SearchCriteria {
                work_modes: vec![],
                provinces: vec![],
                companies: vec![],
                ..SearchCriteria::new("engineer")
            })
            .await
            .unwrap();
        assert_eq!(absent, empty);
        assert_eq!(absent.total, 2);
    }

    #[tokio::test]
    async fn date_range_is_inclusive() {
        let older = job(1, 1, "Engineer", 48);
        let newer = job(2, 1, "Engineer", 0);
        let from = older.created_at;
        let to = newer.created_at;
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![older, newer]);

        let both = SearchCriteria {
            created_from: Some(from),
            created_to: Some(to),
            ..SearchCriteria::new("engineer")
        };
        assert_eq!(repo.search(&both).await.unwrap().total, 2);

        let only_newer = SearchCriteria {
            created_from: Some(from + time::Duration::seconds(1)),
            ..SearchCriteria::new("engineer")
        };
        assert_eq!(repo.search(&only_newer).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn stopword_query_matches_nothing() {
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![job(1, 1, "The Engineer", 0)]);

        let page = repo.search(&SearchCriteria::new("the")).await.unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn updating_indexed_fields_refreshes_document() {
        let repo = MemoryJobRepository::new()
            .with_companies(vec![company(1, "Acme")])
            .with_jobs(vec![job(1, 1, "Designer", 0)]);
        assert_eq!(repo.search(&SearchCriteria::new("rust")).await.unwrap().total, 0);

        let mut updated = job(1, 1, "Designer", 0);
        updated.must_have_skills = Some(vec!["Rust".to_string()]);
        repo.upsert_job(updated);

        assert_eq!(repo.search(&SearchCriteria::new("rust")).await.unwrap().total, 1);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn facets_count_companies_ignoring_company_filter() {
        let repo = MemoryJobRepository::new()
            .with_companies(vec![
                company(1, "Acme"),
                company(2, "Globex"),
                company(3, "Initech"),
                CompanyRecord {
                    is_active: false,
                    ..company(4, "Hooli")
                },
            ])
            .with_jobs(vec![
                job(1, 1, "Engineer", 0),
                job(2, 2, "Engineer", 0),
                job(3, 2, "Engineer", 0),
                job(4, 3, "Engineer", 0),
                job(5, 4, "Engineer", 0),
                job(6, 1, "Designer", 0),
            ]);

        let criteria = SearchCriteria {
            companies: vec!["Acme".to_string()],
            ..SearchCriteria::new("engineer")
        };
        let facets = repo.facet_companies(&criteria, 100).await.unwrap();
        let pairs: Vec<(&str, i64)> = facets
            .iter()
            .map(|f| (f.company_name.as_str(), f.job_count))
            .collect();
        assert_eq!(pairs, [("Globex", 2), ("Acme", 1), ("Initech", 1)]);

        let capped = repo.facet_companies(&criteria, 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }

    #[test]
    fn seed_deserializes_from_json() {
        let seed: Seed = serde_json::from_value(serde_json::json!({
            "companies": [{ "id": 1, "name": "Acme", "isActive": true }],
            "jobs": [{
                "id": 1,
                "companyId": 1,
                "title": "Engineer",
                "isActive": true,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z"
            }]
        }))
        .unwrap();
        let repo = MemoryJobRepository::from_seed(seed);
        assert_eq!(repo.len(), 1);
    }
}
