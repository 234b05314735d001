use serde::Serialize;

use crate::models::{EnrichedMovie, MovieDetails, MovieSummary, SystemInfo, UiState};

/// Everything the front end displays, held behind the store's lock
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct StoreState {
    pub system_info: Option<SystemInfo>,
    #[serde(flatten)]
    pub ui: UiState,

    pub search_results: Vec<MovieSummary>,
    pub search_query: String,

    pub content_recommendations: Vec<EnrichedMovie>,
    pub movie_details: Option<MovieDetails>,
    pub similar_movies: Vec<EnrichedMovie>,
    pub random_movies: Vec<EnrichedMovie>,
}

impl StoreState {
    pub fn has_search_results(&self) -> bool {
        !self.search_results.is_empty()
    }

    pub fn has_content_recommendations(&self) -> bool {
        !self.content_recommendations.is_empty()
    }

    pub fn movie_recommendations_count(&self) -> usize {
        self.content_recommendations.len()
    }

    /// Drops everything tied to the selected movie
    pub fn clear_movie_data(&mut self) {
        self.content_recommendations.clear();
        self.movie_details = None;
        self.similar_movies.clear();
        self.ui.selected_movie = None;
    }

    /// Clears all result caches, the query, the selection and the error
    ///
    /// View, loading flag and system info are left as they are.
    pub fn reset(&mut self) {
        self.search_results.clear();
        self.search_query.clear();
        self.content_recommendations.clear();
        self.movie_details = None;
        self.similar_movies.clear();
        self.random_movies.clear();
        self.ui.selected_movie = None;
        self.ui.error = None;
    }
}
