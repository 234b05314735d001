use serde::Deserialize;

pub mod movie;
pub mod ui;

pub use movie::{EnrichedMovie, Genres, MovieDetails, MovieSummary};
pub use ui::{UiState, View};

/// Opaque backend metadata returned by `/info`
pub type SystemInfo = serde_json::Value;

// ============================================================================
// Recommendation backend response envelopes
// ============================================================================

/// Response from GET /content-based/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<MovieSummary>,
}

/// Response from GET /content-based/recommend
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendResponse {
    #[serde(default)]
    pub recommendations: Vec<MovieSummary>,
}

/// Response from GET /content-based/details
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsResponse {
    pub details: MovieDetails,
}

/// Response from GET /content-based/random
#[derive(Debug, Clone, Deserialize)]
pub struct RandomResponse {
    #[serde(default)]
    pub random_movies: Vec<MovieSummary>,
}

/// Response from GET /content-based/similar
#[derive(Debug, Clone, Deserialize)]
pub struct SimilarResponse {
    #[serde(default)]
    pub similar_movies: Vec<MovieSummary>,
}
