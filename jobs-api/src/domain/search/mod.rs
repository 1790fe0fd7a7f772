//! Job search: lexical documents, query parsing and the search service.
//!
//! # Architecture
//!
//! - [`JobRepository`] - matching, ordering and facet counting (PostgreSQL, in-memory)
//! - [`SearchService`] - validation and defaults, also a [`jobs_core::QueryExecutor`]
//! - [`lexical`] - the weighted document every job carries, and its analyzers
//!
//! # Example
//!
//! ```ignore
//! use jobs_api::domain::search::{SearchConfig, SearchService};
//! use jobs_api::domain::search::repository::PgJobRepository;
//!
//! let repository = Arc::new(PgJobRepository::new(pool));
//! let service = SearchService::new(repository, SearchConfig::default());
//!
//! let page = service.search(&SearchCriteria::new("rust engineer")).await?;
//! ```
//!
//! # Query Syntax
//!
//! Queries follow PostgreSQL's `websearch_to_tsquery`:
//!
//! - `rust backend` → jobs mentioning both
//! - `"data engineer"` → quoted words are required
//! - `developer -java` → excludes jobs mentioning java
//! - `rust or golang` → either

pub mod lexical;
mod query;
mod service;
mod traits;

pub mod repository;

pub use service::{SearchConfig, SearchService};
pub use traits::JobRepository;
