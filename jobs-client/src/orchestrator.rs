//! Turns explicit search events into the smallest set of executor calls.
//!
//! Filter edits never reach the network. A request is only considered on
//! [`SearchEvent`]s, and then skipped when the same criteria are already in
//! flight or cached and fresh. Completions carry their criteria so a late
//! answer for an older search can never replace the one on screen.

use std::collections::HashSet;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{debug, warn};

use jobs_core::{
    CriteriaKey, FacetCount, QueryExecutor, SearchCriteria, SearchError, SearchResultPage,
    DEFAULT_PAGE_SIZE,
};

use crate::cache::{Freshness, SearchCache};
use crate::filters::{FilterState, PreconditionError};
use crate::url_codec;

#[derive(Debug, Clone)]
pub enum SearchState {
    Idle,
    Pending(SearchCriteria),
    Settled(SearchCriteria, Arc<SearchResultPage>),
    Failed(SearchCriteria, SearchError),
}

impl SearchState {
    pub fn criteria(&self) -> Option<&SearchCriteria> {
        match self {
            SearchState::Idle => None,
            SearchState::Pending(c) | SearchState::Settled(c, _) | SearchState::Failed(c, _) => {
                Some(c)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// First render, hydrated from the current query string.
    Mount(String),
    /// Explicit search with the current filters, back to page 1.
    Submit,
    ChangePage(u32),
    /// Browser history moved to `query_string`.
    Navigate(String),
}

/// What a [`SearchEvent`] requires from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Nothing to search for; state is `Idle`.
    Idle,
    /// Nothing cached: execute, then [`SearchOrchestrator::complete`].
    Fetch(SearchCriteria),
    /// A stale page is already shown; execute in the background.
    Refresh(SearchCriteria),
    /// A fresh cached page was settled immediately.
    Cached,
    /// The same criteria are already in flight.
    Suppressed,
}

/// What the view should show after an event.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// Empty while pending, idle or failed.
    pub page: Arc<SearchResultPage>,
    pub error: Option<SearchError>,
    /// Criteria whose cached page is stale and should be refreshed with
    /// [`SearchOrchestrator::refresh`].
    pub refresh: Option<SearchCriteria>,
}

impl SearchOutcome {
    /// Whether offering a retry makes sense.
    pub fn can_retry(&self) -> bool {
        self.error.as_ref().is_some_and(SearchError::is_recoverable)
    }
}

pub struct SearchOrchestrator<E> {
    executor: E,
    cache: SearchCache,
    filters: FilterState,
    page_size: u32,
    state: SearchState,
    /// Filters of the last submitted or navigated search, which page
    /// changes keep using while the draft is edited.
    submitted: FilterState,
    latest: Option<CriteriaKey>,
    in_flight: HashSet<CriteriaKey>,
    url: Option<String>,
}

impl<E: QueryExecutor> SearchOrchestrator<E> {
    pub fn new(executor: E, cache: SearchCache) -> Self {
        Self {
            executor,
            cache,
            filters: FilterState::new(),
            page_size: DEFAULT_PAGE_SIZE,
            state: SearchState::Idle,
            submitted: FilterState::new(),
            latest: None,
            in_flight: HashSet::new(),
            url: None,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Edit filters and query text. Does not trigger a search.
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Canonical query string of the last submit or page change.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn current_page(&self) -> u32 {
        self.state.criteria().map_or(1, |c| c.page)
    }

    /// Applies `event` to the state machine and reports whether the caller
    /// must execute a request.
    pub fn dispatch(&mut self, event: SearchEvent) -> Result<Dispatch, PreconditionError> {
        let now = OffsetDateTime::now_utc();
        match event {
            SearchEvent::Submit => {
                let criteria = self.filters.to_criteria(1, self.page_size, now)?;
                self.submitted = self.filters.normalized();
                self.url = Some(url_codec::encode(&self.submitted, 1));
                Ok(self.request(criteria))
            }
            SearchEvent::ChangePage(page) => {
                let page = page.max(1);
                // Unsubmitted draft edits never ride along with a page change.
                let criteria = match self.state.criteria() {
                    Some(current) => current.clone().with_page(page),
                    None => {
                        let criteria = self.filters.to_criteria(page, self.page_size, now)?;
                        self.submitted = self.filters.normalized();
                        criteria
                    }
                };
                self.url = Some(url_codec::encode(&self.submitted, page));
                Ok(self.request(criteria))
            }
            SearchEvent::Mount(query_string) | SearchEvent::Navigate(query_string) => {
                let (filters, page) = url_codec::decode(&query_string);
                self.filters = filters;
                self.submitted = self.filters.normalized();
                match self.filters.to_criteria(page, self.page_size, now) {
                    Ok(criteria) => Ok(self.request(criteria)),
                    Err(PreconditionError::EmptyQuery) => {
                        self.state = SearchState::Idle;
                        self.latest = None;
                        Ok(Dispatch::Idle)
                    }
                }
            }
        }
    }

    fn request(&mut self, criteria: SearchCriteria) -> Dispatch {
        let key = criteria.key();
        self.latest = Some(key.clone());

        if self.in_flight.contains(&key) {
            debug!(%key, "Search already in flight");
            if !matches!(&self.state, SearchState::Settled(c, _) if c.key() == key) {
                self.state = match self.cache.get(&key) {
                    Some(hit) => SearchState::Settled(criteria, hit.page),
                    None => SearchState::Pending(criteria),
                };
            }
            return Dispatch::Suppressed;
        }

        match self.cache.get(&key) {
            Some(hit) if hit.freshness == Freshness::Fresh => {
                debug!(%key, "Serving fresh cached page");
                self.state = SearchState::Settled(criteria, hit.page);
                Dispatch::Cached
            }
            Some(hit) => {
                debug!(%key, "Serving stale cached page, refreshing");
                self.state = SearchState::Settled(criteria.clone(), hit.page);
                Dispatch::Refresh(criteria)
            }
            None => {
                self.state = SearchState::Pending(criteria.clone());
                self.in_flight.insert(key);
                Dispatch::Fetch(criteria)
            }
        }
    }

    /// Records the result for `criteria`. Successful pages are always
    /// cached; state only changes if `criteria` is still the latest request.
    /// Returns whether the visible state changed.
    pub fn complete(
        &mut self,
        criteria: SearchCriteria,
        result: Result<SearchResultPage, SearchError>,
    ) -> bool {
        let key = criteria.key();
        self.in_flight.remove(&key);

        let next = match result {
            Ok(page) => SearchState::Settled(criteria, self.cache.insert(key.clone(), page)),
            Err(error) => {
                warn!(%key, kind = ?error.kind(), error = %error, "Search failed");
                SearchState::Failed(criteria, error)
            }
        };

        if self.latest.as_ref() != Some(&key) {
            debug!(%key, "Discarding superseded search result");
            return false;
        }
        self.state = next;
        true
    }

    pub fn outcome(&self) -> SearchOutcome {
        let empty = || {
            let limit = i64::from(self.page_size);
            let offset = i64::from(self.current_page().saturating_sub(1)) * limit;
            Arc::new(SearchResultPage::empty(limit, offset))
        };
        let (page, error) = match &self.state {
            SearchState::Settled(_, page) => (Arc::clone(page), None),
            SearchState::Failed(_, error) => (empty(), Some(error.clone())),
            SearchState::Idle | SearchState::Pending(_) => (empty(), None),
        };
        SearchOutcome {
            page,
            error,
            refresh: None,
        }
    }

    /// Dispatches `event` and executes a required fetch. A stale cache hit
    /// returns immediately with the stale page and `refresh` set.
    pub async fn run(&mut self, event: SearchEvent) -> Result<SearchOutcome, PreconditionError> {
        match self.dispatch(event)? {
            Dispatch::Fetch(criteria) => {
                let result = self.executor.search(&criteria).await;
                self.complete(criteria, result);
                Ok(self.outcome())
            }
            Dispatch::Refresh(criteria) => Ok(SearchOutcome {
                refresh: Some(criteria),
                ..self.outcome()
            }),
            Dispatch::Idle | Dispatch::Cached | Dispatch::Suppressed => Ok(self.outcome()),
        }
    }

    /// Re-executes `criteria` after a stale hit. Returns whether the visible
    /// state changed.
    pub async fn refresh(&mut self, criteria: SearchCriteria) -> bool {
        self.in_flight.insert(criteria.key());
        let result = self.executor.search(&criteria).await;
        self.complete(criteria, result)
    }

    /// Job counts per company for the current search, ignoring the company
    /// filter so every company stays selectable.
    pub async fn company_facets(&self) -> Result<Vec<FacetCount>, SearchError> {
        let Some(criteria) = self.state.criteria() else {
            return Ok(Vec::new());
        };
        self.executor
            .facet_companies(&criteria.without_company(), None)
            .await
    }
}
