//! Command-line front end: runs one store action and reports the result as JSON.

use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::{
    config::Config,
    models::View,
    services::client::{ApiClient, DEFAULT_SIMILARITY_TYPE},
    store::MovieStore,
};

#[derive(Parser, Debug)]
#[command(name = "movie-explorer")]
#[command(about = "Browse content-based movie recommendations", long_about = None)]
pub struct Cli {
    /// Recommendation backend base URL (overrides API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Show backend system information
    Info,
    /// Check backend health
    Health,
    /// Search movies by title
    Search {
        query: String,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Content-based recommendations for a movie
    Recommend {
        movie: String,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Full details for a movie
    Details { movie: String },
    /// Random movies from the catalogue
    Random {
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Movies similar to a movie
    Similar {
        movie: String,
        #[arg(long = "type", default_value = DEFAULT_SIMILARITY_TYPE)]
        similarity_type: String,
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
}

impl Command {
    /// View a front end would show for this command
    pub fn view(&self) -> View {
        match self {
            Command::Info | Command::Health => View::About,
            Command::Search { .. } | Command::Random { .. } => View::Explore,
            Command::Recommend { .. } => View::ContentBased,
            Command::Details { .. } | Command::Similar { .. } => View::MovieDetails,
        }
    }
}

/// Executes `cli` against the backend and returns the value to print
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<Value> {
    let base_url = cli.api_url.unwrap_or(config.api_base_url);
    let client = ApiClient::new(base_url)?;
    tracing::debug!(base_url = %client.base_url(), "Using recommendation backend");
    let store = MovieStore::new(Arc::new(client));
    let default_limit = config.default_limit;

    store.set_current_view(cli.command.view());
    tracing::debug!(command = ?cli.command, "Dispatching command");

    let outcome = match &cli.command {
        Command::Info => store.fetch_system_info().await,
        Command::Health => store.check_health().await,
        Command::Search { query, limit } => store
            .search_movies(query, limit.unwrap_or(default_limit))
            .await
            .and_then(to_value),
        Command::Recommend { movie, limit } => store
            .get_content_recommendations(movie, limit.unwrap_or(default_limit))
            .await
            .and_then(to_value),
        Command::Details { movie } => store.get_movie_details(movie).await.and_then(to_value),
        Command::Random { limit } => store
            .get_random_movies(limit.unwrap_or(default_limit))
            .await
            .and_then(to_value),
        Command::Similar {
            movie,
            similarity_type,
            limit,
        } => store
            .get_similar_movies(movie, similarity_type, limit.unwrap_or(default_limit))
            .await
            .and_then(to_value),
    };

    outcome.map_err(|e| anyhow!(store.error().unwrap_or_else(|| e.to_string())))
}

fn to_value<T: serde::Serialize>(value: T) -> crate::error::AppResult<Value> {
    serde_json::to_value(value).map_err(|e| crate::error::AppError::Decode(e.to_string()))
}
