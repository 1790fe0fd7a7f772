//! Shared job-search domain: closed vocabularies, search criteria, result
//! pages, the error taxonomy and the [`QueryExecutor`] seam between the
//! browsing client and the search service.

mod criteria;
mod error;
mod executor;
mod job;
mod page;
pub mod vocabulary;

pub use criteria::{CriteriaKey, SearchCriteria, DEFAULT_FACET_LIMIT, DEFAULT_PAGE_SIZE};
pub use error::{ErrorKind, SearchError};
pub use executor::QueryExecutor;
pub use job::{CompanyRecord, JobRecord, JobRow};
pub use page::{FacetCount, SearchResultPage};
pub use vocabulary::{
    EmploymentType, ExperienceLevel, JobFunction, Language, Location, Province, WorkMode,
};
