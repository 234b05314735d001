//! Enrichment of partial movie records with their full details
//!
//! Each entry of a recommendation, similar-movie or random-movie list is looked up by
//! title and merged with its details. Lookups run as independent tasks; a failed lookup
//! only degrades its own entry to the fallback shape.
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;

use crate::{
    error::AppResult,
    models::{EnrichedMovie, MovieDetails, MovieSummary},
    services::client::MovieApi,
};

/// Overview used when neither the details nor the entry carry one
pub const NO_DESCRIPTION: &str = "No description available.";
/// Overview used when the detail lookup failed and the entry carries none
pub const DESCRIPTION_UNAVAILABLE: &str = "Description not available.";

/// Whether an entry's own fields may stand in for a detail lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailPolicy {
    /// Fetch details for every entry
    Always,
    /// Entries that already carry an overview are merged with themselves
    SkipWhenOverviewPresent,
}

enum PendingDetails {
    Ready(MovieDetails),
    Fetching(JoinHandle<AppResult<MovieDetails>>),
}

/// Enriches a batch of entries, preserving input order
///
/// All lookups are started before any is awaited. The output always has the same
/// length as the input.
pub async fn enrich_batch(
    api: Arc<dyn MovieApi>,
    entries: Vec<MovieSummary>,
    policy: DetailPolicy,
) -> Vec<EnrichedMovie> {
    let mut pending = Vec::with_capacity(entries.len());

    for entry in entries {
        let details = if policy == DetailPolicy::SkipWhenOverviewPresent && entry.has_overview() {
            PendingDetails::Ready(MovieDetails::from(&entry))
        } else {
            let api = Arc::clone(&api);
            let title = entry.title.clone();
            PendingDetails::Fetching(tokio::spawn(async move { api.get_details(&title).await }))
        };
        pending.push((entry, details));
    }

    let mut enriched = Vec::with_capacity(pending.len());
    let mut fallback_count = 0usize;

    for (entry, details) in pending {
        let outcome = match details {
            PendingDetails::Ready(details) => Ok(details),
            PendingDetails::Fetching(task) => match task.await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(e) => Err(format!("detail task failed: {}", e)),
            },
        };

        match outcome {
            Ok(details) => enriched.push(merge_details(entry, &details)),
            Err(e) => {
                tracing::warn!(title = %entry.title, error = %e, "Failed to get movie details");
                fallback_count += 1;
                enriched.push(fallback(entry));
            }
        }
    }

    if fallback_count > 0 {
        tracing::warn!(
            success_count = enriched.len() - fallback_count,
            fallback_count,
            "Partial enrichment failure"
        );
    }

    enriched
}

/// Merges an entry with its details
///
/// Per field: details value if present (non-empty for text) → entry's value →
/// default. `vote_average` additionally falls back to the entry's `avg_score`.
/// A detail value of `0` counts as present.
pub fn merge_details(entry: MovieSummary, details: &MovieDetails) -> EnrichedMovie {
    let genres = details
        .genres
        .as_ref()
        .map(|g| g.normalize())
        .filter(|g| !g.is_empty())
        .or_else(|| entry.genres.as_ref().map(|g| g.normalize()))
        .unwrap_or_default();

    EnrichedMovie {
        poster_path: text(&details.poster_path, &entry.poster_path),
        overview: text(&details.overview, &entry.overview)
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
        vote_average: details
            .vote_average
            .or(entry.vote_average)
            .or(entry.avg_score)
            .unwrap_or(0.0),
        vote_count: details.vote_count.or(entry.vote_count).unwrap_or(0.0),
        popularity: details.popularity.or(entry.popularity).unwrap_or(0.0),
        release_date: text(&details.release_date, &entry.release_date),
        genres,
        runtime: details.runtime.or(entry.runtime),
        budget: details.budget.or(entry.budget),
        revenue: details.revenue.or(entry.revenue),
        production_company: text(&details.production_company, &entry.production_company),
        title: entry.title,
        score: entry.score,
        extra: carried_fields(entry.extra, entry.avg_score),
    }
}

/// Builds the display record for an entry whose detail lookup failed
pub fn fallback(entry: MovieSummary) -> EnrichedMovie {
    EnrichedMovie {
        poster_path: entry.poster_path.filter(|s| !s.is_empty()),
        overview: entry
            .overview
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DESCRIPTION_UNAVAILABLE.to_string()),
        vote_average: entry.vote_average.or(entry.avg_score).unwrap_or(0.0),
        vote_count: 0.0,
        popularity: 0.0,
        release_date: None,
        genres: Vec::new(),
        runtime: None,
        budget: None,
        revenue: None,
        production_company: None,
        title: entry.title,
        score: entry.score,
        extra: carried_fields(entry.extra, entry.avg_score),
    }
}

fn text(preferred: &Option<String>, secondary: &Option<String>) -> Option<String> {
    preferred
        .as_ref()
        .filter(|s| !s.is_empty())
        .or_else(|| secondary.as_ref().filter(|s| !s.is_empty()))
        .cloned()
}

fn carried_fields(
    mut extra: serde_json::Map<String, Value>,
    avg_score: Option<f64>,
) -> serde_json::Map<String, Value> {
    if let Some(avg_score) = avg_score {
        extra.insert("avg_score".to_string(), Value::from(avg_score));
    }
    extra
}
