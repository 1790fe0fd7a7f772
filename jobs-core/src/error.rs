use serde::{Deserialize, Serialize};

/// Failure of a search or facet query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid search input: {0}")]
    Validation(String),
    #[error("constraint violated: {0}")]
    Constraint(String),
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("permission denied: {0}")]
    Permission(String),
    #[error("{0}")]
    Unknown(String),
}

/// Wire code for a [`SearchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    QueryError,
    NotFound,
    ValidationError,
    ConstraintError,
    ConnectionError,
    TimeoutError,
    PermissionError,
    UnknownError,
}

impl SearchError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    pub fn from_kind(kind: ErrorKind, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match kind {
            ErrorKind::QueryError => Self::Query(msg),
            ErrorKind::NotFound => Self::NotFound(msg),
            ErrorKind::ValidationError => Self::Validation(msg),
            ErrorKind::ConstraintError => Self::Constraint(msg),
            ErrorKind::ConnectionError => Self::Connection(msg),
            ErrorKind::TimeoutError => Self::Timeout(msg),
            ErrorKind::PermissionError => Self::Permission(msg),
            ErrorKind::UnknownError => Self::Unknown(msg),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Query(_) => ErrorKind::QueryError,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Constraint(_) => ErrorKind::ConstraintError,
            Self::Connection(_) => ErrorKind::ConnectionError,
            Self::Timeout(_) => ErrorKind::TimeoutError,
            Self::Permission(_) => ErrorKind::PermissionError,
            Self::Unknown(_) => ErrorKind::UnknownError,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Query(msg)
            | Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Constraint(msg)
            | Self::Connection(msg)
            | Self::Timeout(msg)
            | Self::Permission(msg)
            | Self::Unknown(msg) => msg,
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Timeout(_) | Self::Query(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_from_kind() {
        let errors = [
            SearchError::Query("a".into()),
            SearchError::NotFound("b".into()),
            SearchError::Validation("c".into()),
            SearchError::Constraint("d".into()),
            SearchError::Connection("e".into()),
            SearchError::Timeout("f".into()),
            SearchError::Permission("g".into()),
            SearchError::Unknown("h".into()),
        ];
        for err in errors {
            assert_eq!(SearchError::from_kind(err.kind(), err.message()), err);
        }
    }

    #[test]
    fn recoverable_kinds() {
        assert!(SearchError::Connection("down".into()).is_recoverable());
        assert!(SearchError::Timeout("slow".into()).is_recoverable());
        assert!(SearchError::Query("boom".into()).is_recoverable());
        assert!(!SearchError::validation("bad").is_recoverable());
        assert!(!SearchError::Permission("no".into()).is_recoverable());
    }

    #[test]
    fn kind_serializes_as_code() {
        let json = serde_json::to_string(&ErrorKind::ValidationError).unwrap();
        assert_eq!(json, "\"VALIDATION_ERROR\"");
        let kind: ErrorKind = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(kind, ErrorKind::NotFound);
    }
}
