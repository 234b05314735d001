//! Recommendation backend client
//!
//! All computation happens in the backend; this module only turns typed calls into
//! GET requests and decodes the JSON envelopes that come back.
//!
//! Endpoints:
//! - `/info`, `/health` → opaque JSON
//! - `/content-based/{search,recommend,details,random,similar}` → typed envelopes
use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client as HttpClient,
};
use serde::de::DeserializeOwned;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        DetailsResponse, MovieDetails, MovieSummary, RandomResponse, RecommendResponse,
        SearchResponse, SimilarResponse,
    },
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_LIMIT: u32 = 10;
pub const DEFAULT_SIMILARITY_TYPE: &str = "tags";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP header carrying the per-request correlation id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Calls the state container makes against the recommendation backend
///
/// `ApiClient` is the production implementation; tests substitute mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieApi: Send + Sync {
    /// Backend metadata blob
    async fn get_info(&self) -> AppResult<serde_json::Value>;

    /// Backend health blob
    async fn get_health(&self) -> AppResult<serde_json::Value>;

    /// Title search
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<MovieSummary>>;

    /// Content-based recommendations for a movie
    async fn recommend(&self, movie: &str, limit: u32) -> AppResult<Vec<MovieSummary>>;

    /// Full details for one movie, keyed by title
    async fn get_details(&self, movie: &str) -> AppResult<MovieDetails>;

    /// Random sample of the catalogue
    async fn get_random(&self, limit: u32) -> AppResult<Vec<MovieSummary>>;

    /// Movies similar to `movie` under the given similarity type (e.g. "tags")
    async fn get_similar(
        &self,
        movie: &str,
        similarity_type: &str,
        limit: u32,
    ) -> AppResult<Vec<MovieSummary>>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl ApiClient {
    /// Builds a client for the backend rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> AppResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = HttpClient::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(default_headers)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issues one GET and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let request_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "backend_request",
            endpoint = %endpoint,
            request_id = %request_id,
        );

        async move {
            let response = self
                .http_client
                .get(&url)
                .header(REQUEST_ID_HEADER, request_id.to_string())
                .query(params)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                tracing::debug!(status = %status, body = %body, "Backend returned error status");
                return Err(AppError::Http { status, body });
            }

            let body = response.text().await?;
            let decoded = serde_json::from_str(&body).map_err(|e| {
                AppError::Decode(format!("{} from {}: {}", std::any::type_name::<T>(), endpoint, e))
            })?;

            tracing::debug!(status = %status, "Backend request completed");

            Ok(decoded)
        }
        .instrument(span)
        .await
    }
}

#[async_trait::async_trait]
impl MovieApi for ApiClient {
    async fn get_info(&self) -> AppResult<serde_json::Value> {
        self.get_json("/info", &[]).await
    }

    async fn get_health(&self) -> AppResult<serde_json::Value> {
        self.get_json("/health", &[]).await
    }

    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<MovieSummary>> {
        let response: SearchResponse = self
            .get_json(
                "/content-based/search",
                &[("q", query.to_string()), ("n", limit.to_string())],
            )
            .await?;

        tracing::debug!(query = %query, results = response.results.len(), "Search completed");

        Ok(response.results)
    }

    async fn recommend(&self, movie: &str, limit: u32) -> AppResult<Vec<MovieSummary>> {
        let response: RecommendResponse = self
            .get_json(
                "/content-based/recommend",
                &[("movie", movie.to_string()), ("n", limit.to_string())],
            )
            .await?;

        Ok(response.recommendations)
    }

    async fn get_details(&self, movie: &str) -> AppResult<MovieDetails> {
        let response: DetailsResponse = self
            .get_json("/content-based/details", &[("movie", movie.to_string())])
            .await?;

        Ok(response.details)
    }

    async fn get_random(&self, limit: u32) -> AppResult<Vec<MovieSummary>> {
        let response: RandomResponse = self
            .get_json("/content-based/random", &[("n", limit.to_string())])
            .await?;

        Ok(response.random_movies)
    }

    async fn get_similar(
        &self,
        movie: &str,
        similarity_type: &str,
        limit: u32,
    ) -> AppResult<Vec<MovieSummary>> {
        let response: SimilarResponse = self
            .get_json(
                "/content-based/similar",
                &[
                    ("movie", movie.to_string()),
                    ("type", similarity_type.to_string()),
                    ("n", limit.to_string()),
                ],
            )
            .await?;

        Ok(response.similar_movies)
    }
}
