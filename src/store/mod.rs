//! Client-side state container
//!
//! `MovieStore` is the context object handed to presentation code. Every action
//! talks to the backend through the injected [`MovieApi`], commits its result with
//! a single state update, and records a readable error string on failure before
//! handing the error back to the caller.
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{AppError, AppResult},
    models::{EnrichedMovie, MovieDetails, MovieSummary, SystemInfo, View},
    services::{
        client::MovieApi,
        enrichment::{enrich_batch, DetailPolicy},
    },
};

mod loading;
pub mod state;

use loading::LoadingGuard;
pub use state::StoreState;

const SYSTEM_INFO_FAILED: &str = "Failed to fetch system information";
const HEALTH_CHECK_FAILED: &str = "Health check failed";
const SEARCH_FAILED: &str = "Failed to search movies";
const RECOMMENDATIONS_FAILED: &str = "Failed to get content recommendations";
const DETAILS_FAILED: &str = "Failed to get movie details";
const SIMILAR_FAILED: &str = "Failed to get similar movies";
const RANDOM_FAILED: &str = "Failed to get random movies";

fn read_state(state: &RwLock<StoreState>) -> RwLockReadGuard<'_, StoreState> {
    state.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write_state(state: &RwLock<StoreState>) -> RwLockWriteGuard<'_, StoreState> {
    state.write().unwrap_or_else(PoisonError::into_inner)
}

/// Shared movie state and the actions that fill it
///
/// Cloning yields another handle to the same state. The lock is never held
/// across an `.await`, so readers always see a committed state.
#[derive(Clone)]
pub struct MovieStore {
    api: Arc<dyn MovieApi>,
    state: Arc<RwLock<StoreState>>,
}

impl MovieStore {
    /// Creates a store with empty state
    pub fn new(api: Arc<dyn MovieApi>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(StoreState::default())),
        }
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    /// Copy of the whole state taken under one lock
    pub fn snapshot(&self) -> StoreState {
        read_state(&self.state).clone()
    }

    pub fn is_loading(&self) -> bool {
        read_state(&self.state).ui.is_loading
    }

    pub fn error(&self) -> Option<String> {
        read_state(&self.state).ui.error.clone()
    }

    pub fn current_view(&self) -> View {
        read_state(&self.state).ui.current_view
    }

    pub fn selected_movie(&self) -> Option<String> {
        read_state(&self.state).ui.selected_movie.clone()
    }

    pub fn system_info(&self) -> Option<SystemInfo> {
        read_state(&self.state).system_info.clone()
    }

    pub fn search_query(&self) -> String {
        read_state(&self.state).search_query.clone()
    }

    pub fn search_results(&self) -> Vec<MovieSummary> {
        read_state(&self.state).search_results.clone()
    }

    pub fn content_recommendations(&self) -> Vec<EnrichedMovie> {
        read_state(&self.state).content_recommendations.clone()
    }

    pub fn movie_details(&self) -> Option<MovieDetails> {
        read_state(&self.state).movie_details.clone()
    }

    pub fn similar_movies(&self) -> Vec<EnrichedMovie> {
        read_state(&self.state).similar_movies.clone()
    }

    pub fn random_movies(&self) -> Vec<EnrichedMovie> {
        read_state(&self.state).random_movies.clone()
    }

    pub fn has_search_results(&self) -> bool {
        read_state(&self.state).has_search_results()
    }

    pub fn has_content_recommendations(&self) -> bool {
        read_state(&self.state).has_content_recommendations()
    }

    pub fn movie_recommendations_count(&self) -> usize {
        read_state(&self.state).movie_recommendations_count()
    }

    // ------------------------------------------------------------------
    // Utility actions
    // ------------------------------------------------------------------

    pub fn set_current_view(&self, view: View) {
        write_state(&self.state).ui.current_view = view;
    }

    pub fn clear_error(&self) {
        write_state(&self.state).ui.error = None;
    }

    pub fn clear_movie_data(&self) {
        write_state(&self.state).clear_movie_data();
    }

    pub fn reset_state(&self) {
        write_state(&self.state).reset();
    }

    /// Records `"<description>: <error>"` as the current error and passes the error on
    fn record_failure(&self, description: &str, error: AppError) -> AppError {
        tracing::error!(error = %error, status = ?error.status(), "{}", description);
        write_state(&self.state).ui.error = Some(format!("{}: {}", description, error));
        error
    }

    // ------------------------------------------------------------------
    // Backend actions
    // ------------------------------------------------------------------

    pub async fn fetch_system_info(&self) -> AppResult<SystemInfo> {
        let _loading = LoadingGuard::begin(&self.state);

        let info = self
            .api
            .get_info()
            .await
            .map_err(|e| self.record_failure(SYSTEM_INFO_FAILED, e))?;

        write_state(&self.state).system_info = Some(info.clone());
        Ok(info)
    }

    /// Health probe; leaves the loading flag and any previous error untouched
    pub async fn check_health(&self) -> AppResult<serde_json::Value> {
        self.api
            .get_health()
            .await
            .map_err(|e| self.record_failure(HEALTH_CHECK_FAILED, e))
    }

    pub async fn search_movies(&self, query: &str, limit: u32) -> AppResult<Vec<MovieSummary>> {
        let _loading = LoadingGuard::begin(&self.state);
        write_state(&self.state).search_query = query.to_string();

        let results = self
            .api
            .search(query, limit)
            .await
            .map_err(|e| self.record_failure(SEARCH_FAILED, e))?;

        tracing::info!(query = %query, results = results.len(), "Movie search completed");

        write_state(&self.state).search_results = results.clone();
        Ok(results)
    }

    /// Recommendations for `movie`, enriched with details
    ///
    /// Entries that already carry an overview are used as-is.
    pub async fn get_content_recommendations(
        &self,
        movie: &str,
        limit: u32,
    ) -> AppResult<Vec<EnrichedMovie>> {
        let _loading = LoadingGuard::begin(&self.state);
        write_state(&self.state).ui.selected_movie = Some(movie.to_string());

        let recommendations = self
            .api
            .recommend(movie, limit)
            .await
            .map_err(|e| self.record_failure(RECOMMENDATIONS_FAILED, e))?;

        let enriched = enrich_batch(
            Arc::clone(&self.api),
            recommendations,
            DetailPolicy::SkipWhenOverviewPresent,
        )
        .await;

        tracing::info!(movie = %movie, count = enriched.len(), "Content recommendations loaded");

        write_state(&self.state).content_recommendations = enriched.clone();
        Ok(enriched)
    }

    pub async fn get_movie_details(&self, movie: &str) -> AppResult<MovieDetails> {
        let _loading = LoadingGuard::begin(&self.state);

        let details = self
            .api
            .get_details(movie)
            .await
            .map_err(|e| self.record_failure(DETAILS_FAILED, e))?;

        write_state(&self.state).movie_details = Some(details.clone());
        Ok(details)
    }

    pub async fn get_similar_movies(
        &self,
        movie: &str,
        similarity_type: &str,
        limit: u32,
    ) -> AppResult<Vec<EnrichedMovie>> {
        let _loading = LoadingGuard::begin(&self.state);

        let similar = self
            .api
            .get_similar(movie, similarity_type, limit)
            .await
            .map_err(|e| self.record_failure(SIMILAR_FAILED, e))?;

        let enriched = enrich_batch(Arc::clone(&self.api), similar, DetailPolicy::Always).await;

        tracing::info!(
            movie = %movie,
            similarity_type = %similarity_type,
            count = enriched.len(),
            "Similar movies loaded"
        );

        write_state(&self.state).similar_movies = enriched.clone();
        Ok(enriched)
    }

    pub async fn get_random_movies(&self, limit: u32) -> AppResult<Vec<EnrichedMovie>> {
        let _loading = LoadingGuard::begin(&self.state);

        let random = self
            .api
            .get_random(limit)
            .await
            .map_err(|e| self.record_failure(RANDOM_FAILED, e))?;

        let enriched = enrich_batch(Arc::clone(&self.api), random, DetailPolicy::Always).await;

        tracing::info!(count = enriched.len(), "Random movies loaded");

        write_state(&self.state).random_movies = enriched.clone();
        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::client::MockMovieApi;
    use reqwest::StatusCode;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn server_error() -> AppError {
        AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: r#"{"error":"model not loaded"}"#.to_string(),
        }
    }

    fn summary_with_overview(title: &str) -> MovieSummary {
        let mut summary = MovieSummary::new(title);
        summary.overview = Some(format!("{} overview", title));
        summary
    }

    /// Search blocks until the gate is opened
    struct GatedApi {
        gate: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl MovieApi for GatedApi {
        async fn get_info(&self) -> AppResult<serde_json::Value> {
            Ok(json!({}))
        }

        async fn get_health(&self) -> AppResult<serde_json::Value> {
            Ok(json!({"status": "healthy"}))
        }

        async fn search(&self, query: &str, _limit: u32) -> AppResult<Vec<MovieSummary>> {
            self.gate.notified().await;
            Ok(vec![MovieSummary::new(query)])
        }

        async fn recommend(&self, _movie: &str, _limit: u32) -> AppResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }

        async fn get_details(&self, _movie: &str) -> AppResult<MovieDetails> {
            Ok(MovieDetails::default())
        }

        async fn get_random(&self, _limit: u32) -> AppResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }

        async fn get_similar(
            &self,
            _movie: &str,
            _similarity_type: &str,
            _limit: u32,
        ) -> AppResult<Vec<MovieSummary>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_search_stores_results_and_query() {
        let mut api = MockMovieApi::new();
        api.expect_search()
            .withf(|query, limit| query == "heat" && *limit == 5)
            .times(1)
            .returning(|_, _| Ok(vec![MovieSummary::new("Heat"), MovieSummary::new("Heat 2")]));

        let store = MovieStore::new(Arc::new(api));
        let results = store.search_movies("heat", 5).await.unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(store.search_results(), results);
        assert_eq!(store.search_query(), "heat");
        assert!(store.has_search_results());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_search_failure_records_error_and_rethrows() {
        let mut api = MockMovieApi::new();
        api.expect_search().returning(|_, _| Err(server_error()));

        let store = MovieStore::new(Arc::new(api));
        let result = store.search_movies("heat", 10).await;

        assert!(matches!(result, Err(AppError::Http { .. })));
        assert_eq!(result.err().and_then(|e| e.status()).map(|s| s.as_u16()), Some(500));
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to search movies: Request failed with status code 500")
        );
        assert!(!store.is_loading());
        assert!(store.search_results().is_empty());
    }

    #[tokio::test]
    async fn test_next_action_clears_previous_error() {
        let mut api = MockMovieApi::new();
        api.expect_search().times(1).returning(|_, _| Err(server_error()));
        api.expect_get_random().times(1).returning(|_| Ok(Vec::new()));

        let store = MovieStore::new(Arc::new(api));
        let _ = store.search_movies("heat", 10).await;
        assert!(store.error().is_some());

        store.get_random_movies(10).await.unwrap();
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_recommendations_only_fetch_missing_details() {
        let mut api = MockMovieApi::new();
        api.expect_recommend()
            .withf(|movie, limit| movie == "Heat" && *limit == 10)
            .returning(|_, _| {
                Ok(vec![
                    summary_with_overview("Ronin"),
                    MovieSummary::new("Thief"),
                    MovieSummary::new("Collateral"),
                ])
            });
        api.expect_get_details()
            .withf(|movie| movie == "Thief")
            .times(1)
            .returning(|_| {
                Ok(MovieDetails {
                    overview: Some("A safecracker".to_string()),
                    ..MovieDetails::default()
                })
            });
        api.expect_get_details()
            .withf(|movie| movie == "Collateral")
            .times(1)
            .returning(|_| {
                Ok(MovieDetails {
                    overview: Some("A cab driver".to_string()),
                    ..MovieDetails::default()
                })
            });

        let store = MovieStore::new(Arc::new(api));
        let recs = store.get_content_recommendations("Heat", 10).await.unwrap();

        assert_eq!(store.selected_movie().as_deref(), Some("Heat"));
        assert_eq!(store.movie_recommendations_count(), 3);
        assert_eq!(recs[0].overview, "Ronin overview");
        assert_eq!(recs[1].overview, "A safecracker");
        assert_eq!(recs[2].overview, "A cab driver");
    }

    #[tokio::test]
    async fn test_random_movies_survive_one_failed_lookup() {
        let mut api = MockMovieApi::new();
        api.expect_get_random().returning(|limit| {
            Ok((0..limit).map(|i| MovieSummary::new(format!("Movie {}", i))).collect())
        });
        api.expect_get_details().times(10).returning(|movie| {
            if movie == "Movie 7" {
                Err(server_error())
            } else {
                Ok(MovieDetails {
                    overview: Some("Found".to_string()),
                    ..MovieDetails::default()
                })
            }
        });

        let store = MovieStore::new(Arc::new(api));
        let random = store.get_random_movies(10).await.unwrap();

        assert_eq!(random.len(), 10);
        assert_eq!(random[7].overview, "Description not available.");
        assert_eq!(random.iter().filter(|m| m.overview == "Found").count(), 9);
        assert!(store.error().is_none());
        assert_eq!(store.random_movies(), random);
    }

    #[tokio::test]
    async fn test_similar_movies_pass_type_through() {
        let mut api = MockMovieApi::new();
        api.expect_get_similar()
            .withf(|movie, kind, limit| movie == "Heat" && kind == "genres" && *limit == 3)
            .times(1)
            .returning(|_, _, _| Ok(vec![MovieSummary::new("Ronin")]));
        api.expect_get_details()
            .returning(|_| Ok(MovieDetails::default()));

        let store = MovieStore::new(Arc::new(api));
        let similar = store.get_similar_movies("Heat", "genres", 3).await.unwrap();

        assert_eq!(similar.len(), 1);
        assert_eq!(store.similar_movies()[0].title, "Ronin");
    }

    #[tokio::test]
    async fn test_similar_failure_message() {
        let mut api = MockMovieApi::new();
        api.expect_get_similar()
            .returning(|_, _, _| Err(server_error()));

        let store = MovieStore::new(Arc::new(api));
        assert!(store.get_similar_movies("Heat", "tags", 10).await.is_err());
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to get similar movies: Request failed with status code 500")
        );
    }

    #[tokio::test]
    async fn test_movie_details_stored() {
        let mut api = MockMovieApi::new();
        api.expect_get_details()
            .withf(|movie| movie == "Heat")
            .returning(|_| {
                Ok(MovieDetails {
                    title: Some("Heat".to_string()),
                    runtime: Some(170.0),
                    ..MovieDetails::default()
                })
            });

        let store = MovieStore::new(Arc::new(api));
        store.get_movie_details("Heat").await.unwrap();

        assert_eq!(store.movie_details().and_then(|d| d.runtime), Some(170.0));
    }

    #[tokio::test]
    async fn test_system_info_replaced_wholesale() {
        let mut api = MockMovieApi::new();
        let mut calls = 0;
        api.expect_get_info().times(2).returning(move || {
            calls += 1;
            if calls == 1 {
                Ok(json!({"version": "1.0", "movies": 4803}))
            } else {
                Ok(json!({"version": "1.1"}))
            }
        });

        let store = MovieStore::new(Arc::new(api));
        store.fetch_system_info().await.unwrap();
        store.fetch_system_info().await.unwrap();

        assert_eq!(store.system_info(), Some(json!({"version": "1.1"})));
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_system_info_failure_clears_loading() {
        let mut api = MockMovieApi::new();
        api.expect_get_info().returning(|| Err(server_error()));

        let store = MovieStore::new(Arc::new(api));
        assert!(store.fetch_system_info().await.is_err());

        assert!(!store.is_loading());
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to fetch system information: Request failed with status code 500")
        );
    }

    #[tokio::test]
    async fn test_health_failure_sets_error() {
        let mut api = MockMovieApi::new();
        api.expect_get_health().returning(|| Err(server_error()));

        let store = MovieStore::new(Arc::new(api));
        assert!(store.check_health().await.is_err());
        assert_eq!(
            store.error().as_deref(),
            Some("Health check failed: Request failed with status code 500")
        );
    }

    #[tokio::test]
    async fn test_loading_spans_in_flight_action() {
        let gate = Arc::new(Notify::new());
        let store = MovieStore::new(Arc::new(GatedApi {
            gate: Arc::clone(&gate),
        }));

        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.search_movies("heat", 10).await })
        };

        while !store.is_loading() {
            tokio::task::yield_now().await;
        }
        assert_eq!(store.search_query(), "heat");
        assert!(store.search_results().is_empty());

        gate.notify_one();
        task.await.unwrap().unwrap();

        assert!(!store.is_loading());
        assert_eq!(store.search_results().len(), 1);
    }

    #[tokio::test]
    async fn test_dropped_action_clears_loading() {
        let store = MovieStore::new(Arc::new(GatedApi {
            gate: Arc::new(Notify::new()),
        }));

        let result =
            tokio::time::timeout(Duration::from_millis(20), store.search_movies("heat", 10)).await;

        assert!(result.is_err());
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_health_does_not_touch_loading() {
        let store = MovieStore::new(Arc::new(GatedApi {
            gate: Arc::new(Notify::new()),
        }));

        let health = store.check_health().await.unwrap();

        assert_eq!(health["status"], "healthy");
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_reset_state_is_atomic() {
        let mut api = MockMovieApi::new();
        api.expect_search()
            .returning(|_, _| Ok(vec![MovieSummary::new("Heat")]));
        api.expect_recommend()
            .returning(|_, _| Ok(vec![summary_with_overview("Ronin")]));

        let store = MovieStore::new(Arc::new(api));
        store.set_current_view(View::ContentBased);
        store.search_movies("heat", 10).await.unwrap();
        store.get_content_recommendations("Heat", 10).await.unwrap();

        store.reset_state();
        let snapshot = store.snapshot();

        assert!(snapshot.search_results.is_empty());
        assert!(snapshot.search_query.is_empty());
        assert!(snapshot.content_recommendations.is_empty());
        assert!(snapshot.ui.selected_movie.is_none());
        assert!(snapshot.ui.error.is_none());
        assert_eq!(snapshot.ui.current_view, View::ContentBased);
    }

    #[tokio::test]
    async fn test_clear_movie_data_and_error() {
        let mut api = MockMovieApi::new();
        api.expect_recommend()
            .returning(|_, _| Ok(vec![summary_with_overview("Ronin")]));

        let store = MovieStore::new(Arc::new(api));
        store.get_content_recommendations("Heat", 10).await.unwrap();
        write_state(&store.state).ui.error = Some("stale".to_string());

        store.clear_movie_data();
        store.clear_error();

        assert!(!store.has_content_recommendations());
        assert!(store.selected_movie().is_none());
        assert!(store.error().is_none());
    }
}
