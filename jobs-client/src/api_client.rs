use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use url::Url;

use jobs_core::{
    ErrorKind, FacetCount, QueryExecutor, SearchCriteria, SearchError, SearchResultPage,
};

/// [`QueryExecutor`] backed by the jobs-api HTTP routes.
#[derive(Debug, Clone)]
pub struct HttpQueryExecutor {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: Option<ErrorKind>,
}

impl HttpQueryExecutor {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        // Keep the path as a directory so joins append instead of replace.
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url
            .join(path)
            .map_err(|e| SearchError::unknown(format!("invalid endpoint {path}: {e}")))
    }

    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        criteria: &SearchCriteria,
    ) -> Result<T, SearchError> {
        let resp = self
            .client
            .post(url)
            .json(criteria)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(response_error(status, &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| SearchError::unknown(format!("invalid response body: {e}")))
    }
}

fn transport_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout(err.to_string())
    } else if err.is_connect() || err.is_request() {
        SearchError::Connection(err.to_string())
    } else {
        SearchError::unknown(err.to_string())
    }
}

/// Error from a non-success response. The server's `{ error, code }` body
/// wins; otherwise the status decides.
fn response_error(status: StatusCode, body: &str) -> SearchError {
    if let Ok(ErrorBody {
        error,
        code: Some(code),
    }) = serde_json::from_str::<ErrorBody>(body)
    {
        return SearchError::from_kind(code, error);
    }

    let message = if body.trim().is_empty() {
        status.to_string()
    } else {
        body.trim().to_string()
    };
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            SearchError::Validation(message)
        }
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => SearchError::Permission(message),
        StatusCode::NOT_FOUND => SearchError::NotFound(message),
        StatusCode::CONFLICT => SearchError::Constraint(message),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
            SearchError::Connection(message)
        }
        StatusCode::GATEWAY_TIMEOUT | StatusCode::REQUEST_TIMEOUT => SearchError::Timeout(message),
        _ => SearchError::Unknown(message),
    }
}

#[async_trait]
impl QueryExecutor for HttpQueryExecutor {
    async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResultPage, SearchError> {
        let url = self.endpoint("search")?;
        self.post(url, criteria).await
    }

    async fn facet_companies(
        &self,
        criteria: &SearchCriteria,
        limit: Option<u32>,
    ) -> Result<Vec<FacetCount>, SearchError> {
        let mut url = self.endpoint("search/facets/companies")?;
        if let Some(limit) = limit {
            url.query_pairs_mut()
                .append_pair("limit", &limit.to_string());
        }
        self.post(url, criteria).await
    }
}
