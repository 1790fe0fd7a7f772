use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{app_state::AppState, routes};

pub fn create(app_state: AppState, app_url: &str) -> Router<()> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(match HeaderValue::from_str(app_url) {
            Ok(origin) => AllowOrigin::exact(origin),
            Err(_) => {
                tracing::warn!(app_url, "Invalid app_url, cross-origin requests are disabled");
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        });

    Router::new()
        .route("/health", get(routes::health::health))
        .nest("/search", routes::search::router())
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
