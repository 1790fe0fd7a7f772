use std::sync::Arc;

use async_trait::async_trait;

use crate::criteria::SearchCriteria;
use crate::error::SearchError;
use crate::page::{FacetCount, SearchResultPage};

/// Something that can run searches: the HTTP client on the browsing side,
/// the search service itself in-process.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a search. Callers must not invoke this with an empty query.
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage, SearchError>;

    /// Company facet counts for `criteria`, ignoring any company filter.
    /// `None` uses the default cap.
    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: Option<u32>,
    ) -> Result<Vec<FacetCount>, SearchError>;
}

#[async_trait]
impl<T> QueryExecutor for Arc<T>
where
    T: QueryExecutor + ?Sized,
{
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage, SearchError> {
        (**self).search(criteria).await
    }

    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: Option<u32>,
    ) -> Result<Vec<FacetCount>, SearchError> {
        (**self).facet_companies(criteria, limit).await
    }
}
