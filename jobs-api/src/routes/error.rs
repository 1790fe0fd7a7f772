use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::fmt;

use jobs_core::{ErrorKind, SearchError};

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: ErrorKind,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: ErrorKind,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorKind::ValidationError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
        ErrorKind::PermissionError => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::ConstraintError => StatusCode::CONFLICT,
        ErrorKind::ConnectionError => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
        ErrorKind::QueryError | ErrorKind::UnknownError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        let kind = err.kind();
        let status = status_for(kind);
        if status.is_server_error() {
            tracing::error!("Search error: {:?}", err);
        }
        Self::new(status, kind, err.message())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
