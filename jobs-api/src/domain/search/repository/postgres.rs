//! PostgreSQL repository using the `search_vector` column the `jobs` table
//! maintains through its trigger (see `migrations/`).

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use time::OffsetDateTime;

use jobs_core::{FacetCount, JobRow, SearchCriteria, SearchError, SearchResultPage};

use crate::domain::search::traits::{JobRepository, Result};

/// PostgreSQL-backed job search.
///
/// Matching uses `websearch_to_tsquery` with the text search configuration
/// named after the requested language, so stemming and stopwords follow the
/// same rules that built each job's weighted vector.
#[derive(Clone)]
pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SearchRow {
    id: i64,
    company_id: i64,
    company_name: String,
    title: String,
    description: Option<String>,
    responsibilities: Option<Vec<String>>,
    must_have_skills: Option<Vec<String>>,
    nice_to_have_skills: Option<Vec<String>>,
    main_technologies: Option<Vec<String>>,
    benefits: Option<Vec<String>>,
    experience_level: Option<String>,
    employment_type: Option<String>,
    location: Option<String>,
    province: Option<String>,
    work_mode: Option<String>,
    job_function: Option<String>,
    language: Option<String>,
    application_url: Option<String>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    relevance: f32,
    total_count: i64,
}

#[derive(sqlx::FromRow)]
struct FacetRow {
    company_name: String,
    job_count: i64,
}

/// Unknown vocabulary values read back as absent rather than failing the page.
fn parse_opt<T: FromStr>(value: Option<String>) -> Option<T> {
    value.and_then(|v| v.parse().ok())
}

impl SearchRow {
    fn into_counted(self) -> (JobRow, i64) {
        let row = JobRow {
            id: self.id,
            company_id: self.company_id,
            company_name: self.company_name,
            title: self.title,
            description: self.description,
            responsibilities: self.responsibilities,
            must_have_skills: self.must_have_skills,
            nice_to_have_skills: self.nice_to_have_skills,
            main_technologies: self.main_technologies,
            benefits: self.benefits,
            experience_level: parse_opt(self.experience_level),
            employment_type: parse_opt(self.employment_type),
            location: parse_opt(self.location),
            province: parse_opt(self.province),
            work_mode: parse_opt(self.work_mode),
            job_function: parse_opt(self.job_function),
            language: parse_opt(self.language),
            application_url: self.application_url,
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
            relevance: self.relevance,
        };
        (row, self.total_count)
    }
}

/// `AND column = ANY($n)` when `values` is non-empty. An empty selection
/// leaves the column unconstrained.
fn push_any<T: AsRef<str>>(builder: &mut QueryBuilder<'_, Postgres>, column: &str, values: &[T]) {
    if values.is_empty() {
        return;
    }
    let values: Vec<String> = values.iter().map(|v| v.as_ref().to_string()).collect();
    builder
        .push(" AND ")
        .push(column)
        .push(" = ANY(")
        .push_bind(values)
        .push(")");
}

/// FROM and WHERE shared by the page and facet queries.
fn push_match<'a>(
    builder: &mut QueryBuilder<'a, Postgres>,
    criteria: &'a SearchCriteria,
    apply_company_filter: bool,
) {
    let config = criteria.language.as_ref();

    builder
        .push(
            " FROM jobs j \
             JOIN companies c ON c.id = j.company_id \
             CROSS JOIN websearch_to_tsquery(",
        )
        .push_bind(config)
        .push("::regconfig, ")
        .push_bind(criteria.query.as_str())
        .push(") AS tsq(query) WHERE j.is_active AND c.is_active AND COALESCE(j.language, 'english') = ")
        .push_bind(config)
        .push(" AND j.search_vector @@ tsq.query");

    push_any(builder, "j.experience_level", &criteria.experience_levels);
    push_any(builder, "j.employment_type", &criteria.employment_types);
    push_any(builder, "j.work_mode", &criteria.work_modes);
    push_any(builder, "j.province", &criteria.provinces);
    push_any(builder, "j.job_function", &criteria.job_functions);
    if apply_company_filter {
        push_any(builder, "c.name", &criteria.companies);
    }

    if let Some(from) = criteria.created_from {
        builder.push(" AND j.created_at >= ").push_bind(from);
    }
    if let Some(to) = criteria.created_to {
        builder.push(" AND j.created_at <= ").push_bind(to);
    }
}

/// Match count alone, for pages past the end where no row carries the
/// window total.
fn count_query(criteria: &SearchCriteria) -> QueryBuilder<'_, Postgres> {
    let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
    push_match(&mut builder, criteria, true);
    builder
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT j.id, j.company_id, c.name AS company_name, j.title, j.description, \
             j.responsibilities, j.must_have_skills, j.nice_to_have_skills, \
             j.main_technologies, j.benefits, j.experience_level, j.employment_type, \
             j.location, j.province, j.work_mode, j.job_function, j.language, \
             j.application_url, j.created_at, j.updated_at, \
             ts_rank(j.search_vector, tsq.query)::float4 AS relevance, \
             COUNT(*) OVER () AS total_count",
        );
        push_match(&mut builder, criteria, true);
        builder
            .push(" ORDER BY j.created_at DESC, j.id DESC LIMIT ")
            .push_bind(criteria.limit())
            .push(" OFFSET ")
            .push_bind(criteria.offset());

        let rows: Vec<SearchRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        if rows.is_empty() && criteria.offset() > 0 {
            let total: i64 = count_query(criteria)
                .build_query_scalar()
                .fetch_one(&self.pool)
                .await
                .map_err(classify)?;
            return Ok(SearchResultPage::new(
                Vec::new(),
                total,
                criteria.limit(),
                criteria.offset(),
            ));
        }

        SearchResultPage::from_counted_rows(
            rows.into_iter().map(SearchRow::into_counted).collect(),
            criteria.limit(),
            criteria.offset(),
        )
    }

    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: i64,
    ) -> Result<Vec<FacetCount>> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT c.name AS company_name, COUNT(*) AS job_count");
        push_match(&mut builder, criteria, false);
        builder
            .push(" GROUP BY c.name ORDER BY job_count DESC, c.name ASC LIMIT ")
            .push_bind(limit);

        let rows: Vec<FacetRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(classify)?;

        Ok(rows
            .into_iter()
            .map(|row| FacetCount {
                company_name: row.company_name,
                job_count: row.job_count,
            })
            .collect())
    }
}

/// Maps a driver error onto the search error taxonomy using the SQLSTATE
/// class where one is available.
pub(crate) fn classify(err: sqlx::Error) -> SearchError {
    let message = err.to_string();
    match &err {
        sqlx::Error::PoolTimedOut => SearchError::Timeout(message),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => SearchError::Connection(message),
        sqlx::Error::RowNotFound => SearchError::NotFound(message),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some("57014") => SearchError::Timeout(message),
            Some("42501") => SearchError::Permission(message),
            Some(code) if code.starts_with("23") => SearchError::Constraint(message),
            Some(code) if code.starts_with("22") => SearchError::Validation(message),
            Some(code) if code.starts_with("08") => SearchError::Connection(message),
            _ => SearchError::Query(message),
        },
        _ => SearchError::Unknown(message),
    }
}
