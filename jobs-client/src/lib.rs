//! Client side of job search: filter state, its query-string form, a shared
//! result cache and the orchestrator that decides when to hit the API.

pub mod api_client;
pub mod cache;
pub mod config;
pub mod filters;
pub mod orchestrator;
pub mod transform;
pub mod url_codec;

pub use api_client::HttpQueryExecutor;
pub use cache::{CacheConfig, SearchCache};
pub use config::ClientConfig;
pub use filters::{
    DatePreset, FilterError, FilterKey, FilterState, MultiSelectKey, PreconditionError,
    SingleSelectKey,
};
pub use orchestrator::{Dispatch, SearchEvent, SearchOrchestrator, SearchOutcome, SearchState};
pub use transform::{posted_label, transform, DisplayJob};
