use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use jobs_core::{FacetCount, SearchCriteria, SearchResultPage};

use super::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(search))
        .route("/facets/companies", post(company_facets))
}

#[derive(Debug, Clone, Deserialize)]
struct FacetQuery {
    limit: Option<u32>,
}

#[instrument(name = "POST /search", skip(app_state, payload))]
async fn search(
    State(app_state): State<AppState>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<SearchResultPage>, ApiError> {
    let Json(criteria) = payload?;
    let page = app_state.search_service.search(&criteria).await?;
    Ok(Json(page))
}

#[instrument(name = "POST /search/facets/companies", skip(app_state, payload))]
async fn company_facets(
    State(app_state): State<AppState>,
    query: Result<Query<FacetQuery>, QueryRejection>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<Vec<FacetCount>>, ApiError> {
    let Query(query) = query?;
    let Json(criteria) = payload?;
    let facets = app_state
        .search_service
        .facet_companies(&criteria, query.limit)
        .await?;
    Ok(Json(facets))
}
