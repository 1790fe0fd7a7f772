//! Search service: validation and defaults in front of a [`JobRepository`].

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use jobs_core::{
    FacetCount, QueryExecutor, SearchCriteria, SearchError, SearchResultPage, DEFAULT_FACET_LIMIT,
};

use super::traits::{JobRepository, Result};

/// Configuration for the search service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Largest page size a caller may request
    pub max_page_size: u32,
    /// Facet cap when the caller gives none
    pub default_facet_limit: u32,
    /// Facet caps above this are lowered to it
    pub max_facet_limit: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_page_size: 100,
            default_facet_limit: DEFAULT_FACET_LIMIT,
            max_facet_limit: 500,
        }
    }
}

/// Validates and normalizes criteria before handing them to the repository.
///
/// # Examples
///
/// ```ignore
/// let service = SearchService::new(Arc::new(repository), SearchConfig::default());
/// let page = service.search(&SearchCriteria::new("rust engineer")).await?;
/// ```
#[derive(Clone)]
pub struct SearchService {
    repository: Arc<dyn JobRepository>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(repository: Arc<dyn JobRepository>, config: SearchConfig) -> Self {
        Self { repository, config }
    }

    pub fn with_defaults(repository: Arc<dyn JobRepository>) -> Self {
        Self::new(repository, SearchConfig::default())
    }

    fn validate(&self, criteria: &SearchCriteria) -> Result<SearchCriteria> {
        if !criteria.has_query() {
            return Err(SearchError::validation("query must not be empty"));
        }
        if criteria.page == 0 {
            return Err(SearchError::validation("page must be at least 1"));
        }
        if criteria.page_size == 0 || criteria.page_size > self.config.max_page_size {
            return Err(SearchError::validation(format!(
                "page size must be between 1 and {}",
                self.config.max_page_size
            )));
        }
        if let (Some(from), Some(to)) = (criteria.created_from, criteria.created_to) {
            if from > to {
                return Err(SearchError::validation(
                    "createdFrom must not be after createdTo",
                ));
            }
        }

        Ok(criteria.normalized())
    }

    fn facet_limit(&self, requested: Option<u32>) -> Result<i64> {
        match requested {
            Some(0) => Err(SearchError::validation("facet limit must be at least 1")),
            Some(limit) => Ok(i64::from(limit.min(self.config.max_facet_limit))),
            None => Ok(i64::from(self.config.default_facet_limit)),
        }
    }

    /// Execute a search.
    ///
    /// Returns a validation error for an empty query, page 0, a page size
    /// outside `1..=max_page_size`, or an inverted date range.
    #[instrument(skip(self, criteria), fields(page = criteria.page, page_size = criteria.page_size))]
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage> {
        let criteria = self.validate(criteria)?;

        match self.repository.search(&criteria).await {
            Ok(page) => {
                debug!(rows = page.rows.len(), total = page.total, "Search completed");
                Ok(page)
            }
            Err(e) => {
                warn!(kind = ?e.kind(), error = %e, "Search failed");
                Err(e)
            }
        }
    }

    /// Job counts per company for `criteria`, ignoring its company filter.
    #[instrument(skip(self, criteria))]
    pub async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: Option<u32>,
    ) -> Result<Vec<FacetCount>> {
        let limit = self.facet_limit(limit)?;
        let criteria = self.validate(criteria)?.without_company();

        let facets = self.repository.facet_companies(&criteria, limit).await?;
        debug!(companies = facets.len(), "Company facets computed");
        Ok(facets)
    }
}

#[async_trait]
impl QueryExecutor for SearchService {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage> {
        SearchService::search(self, criteria).await
    }

    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: Option<u32>,
    ) -> Result<Vec<FacetCount>> {
        SearchService::facet_companies(self, criteria, limit).await
    }
}
