//! Trait definitions for the search domain.
//!
//! The repository trait lets the service run against PostgreSQL in
//! production and an in-memory store in tests and local development.

use async_trait::async_trait;
use jobs_core::{FacetCount, SearchCriteria, SearchError, SearchResultPage};

pub type Result<T> = std::result::Result<T, SearchError>;

/// Full-text job search over active postings of active companies.
///
/// Implementations receive criteria that are already normalized and
/// validated: the query is non-empty and the page size is positive.
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Ranked, filtered page of jobs ordered by creation time, newest first,
    /// with the total match count.
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage>;

    /// Matching job counts per company, ignoring any company filter in
    /// `criteria`. Ordered by count descending, then name.
    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: i64,
    ) -> Result<Vec<FacetCount>>;
}
