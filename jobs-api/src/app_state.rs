use sqlx::PgPool;

use crate::domain::search::SearchService;

#[derive(Clone)]
pub struct AppState {
    pub search_service: SearchService,
    /// Present when jobs are served from PostgreSQL; used by the health check.
    pub db_pool: Option<PgPool>,
}

impl AppState {
    pub fn new(search_service: SearchService, db_pool: Option<PgPool>) -> Self {
        Self {
            search_service,
            db_pool,
        }
    }
}
