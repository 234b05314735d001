use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Decodes an optional field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw: Option<Value> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Genre list as sent by the backend: either a JSON list or one comma-separated string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Genres {
    List(Vec<String>),
    Joined(String),
    /// Any other JSON shape; normalizes to no genres
    Other(Value),
}

impl Genres {
    /// Normalizes to a list of genre names
    ///
    /// Lists are returned verbatim. Joined strings are split on `,` with each
    /// element trimmed and empty segments dropped.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Genres::List(genres) => genres.clone(),
            Genres::Joined(joined) => joined
                .split(',')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect(),
            Genres::Other(_) => Vec::new(),
        }
    }
}

/// Partial movie record returned by the search, recommend, random and similar endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub title: String,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Older name for `vote_average` still sent by the recommend endpoint
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub vote_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Genres>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub runtime: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub production_company: Option<String>,
    /// Fields this crate does not interpret, kept so they reach the display record
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieSummary {
    /// Creates a summary carrying only a title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            score: None,
            poster_path: None,
            overview: None,
            vote_average: None,
            avg_score: None,
            vote_count: None,
            popularity: None,
            release_date: None,
            genres: None,
            runtime: None,
            budget: None,
            revenue: None,
            production_company: None,
            extra: Map::new(),
        }
    }

    /// True when the entry already carries a usable overview
    pub fn has_overview(&self) -> bool {
        self.overview.as_deref().is_some_and(|o| !o.is_empty())
    }
}

/// Canonical movie record from GET /content-based/details
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MovieDetails {
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub poster_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub vote_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub genres: Option<Genres>,
    #[serde(default, deserialize_with = "lenient")]
    pub runtime: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub budget: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub revenue: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub production_company: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<&MovieSummary> for MovieDetails {
    /// Treats a summary that already carries detail fields as its own details
    fn from(summary: &MovieSummary) -> Self {
        Self {
            title: Some(summary.title.clone()),
            poster_path: summary.poster_path.clone(),
            overview: summary.overview.clone(),
            vote_average: summary.vote_average,
            vote_count: summary.vote_count,
            popularity: summary.popularity,
            release_date: summary.release_date.clone(),
            genres: summary.genres.clone(),
            runtime: summary.runtime,
            budget: summary.budget,
            revenue: summary.revenue,
            production_company: summary.production_company.clone(),
            extra: Map::new(),
        }
    }
}

/// Display-ready movie: a summary merged with its details
///
/// Records built from a failed detail lookup have the same shape, with
/// detail-only fields at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedMovie {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub poster_path: Option<String>,
    pub overview: String,
    pub vote_average: f64,
    pub vote_count: f64,
    pub popularity: f64,
    pub release_date: Option<String>,
    pub genres: Vec<String>,
    pub runtime: Option<f64>,
    pub budget: Option<f64>,
    pub revenue: Option<f64>,
    pub production_company: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_genres_joined_string_is_split_and_trimmed() {
        let genres = Genres::Joined("Action, Drama".to_string());
        assert_eq!(genres.normalize(), vec!["Action", "Drama"]);
    }

    #[test]
    fn test_genres_list_is_kept_verbatim() {
        let genres = Genres::List(vec!["Action".to_string(), " Drama".to_string()]);
        assert_eq!(genres.normalize(), vec!["Action", " Drama"]);
    }

    #[test]
    fn test_genres_empty_string_normalizes_to_empty() {
        assert!(Genres::Joined(String::new()).normalize().is_empty());
        assert_eq!(
            Genres::Joined("Crime,, Thriller ,".to_string()).normalize(),
            vec!["Crime", "Thriller"]
        );
    }

    #[test]
    fn test_genres_deserialize_each_shape() {
        let list: Genres = serde_json::from_value(json!(["Action", "Drama"])).unwrap();
        let joined: Genres = serde_json::from_value(json!("Action, Drama")).unwrap();
        let other: Genres = serde_json::from_value(json!(42)).unwrap();

        assert_eq!(list, Genres::List(vec!["Action".into(), "Drama".into()]));
        assert_eq!(joined, Genres::Joined("Action, Drama".into()));
        assert!(other.normalize().is_empty());
    }

    #[test]
    fn test_summary_keeps_unknown_fields() {
        let summary: MovieSummary = serde_json::from_value(json!({
            "title": "Heat",
            "score": 0.83,
            "movie_id": 949,
            "avg_score": 7.9
        }))
        .unwrap();

        assert_eq!(summary.title, "Heat");
        assert_eq!(summary.avg_score, Some(7.9));
        assert_eq!(summary.extra.get("movie_id"), Some(&json!(949)));
        assert!(!summary.has_overview());
    }

    #[test]
    fn test_summary_empty_overview_is_not_an_overview() {
        let mut summary = MovieSummary::new("Heat");
        summary.overview = Some(String::new());
        assert!(!summary.has_overview());

        summary.overview = Some("A group of professional bank robbers".to_string());
        assert!(summary.has_overview());
    }

    #[test]
    fn test_details_tolerate_nulls() {
        let details: MovieDetails = serde_json::from_value(json!({
            "title": "Heat",
            "vote_average": null,
            "genres": null,
            "runtime": 170
        }))
        .unwrap();

        assert_eq!(details.vote_average, None);
        assert_eq!(details.genres, None);
        assert_eq!(details.runtime, Some(170.0));
    }

    #[test]
    fn test_wrong_typed_fields_decode_as_absent() {
        let summary: MovieSummary = serde_json::from_value(json!({
            "title": "Ronin",
            "runtime": "unknown",
            "vote_average": "n/a",
            "poster_path": 17,
            "budget": 55000000
        }))
        .unwrap();

        assert_eq!(summary.runtime, None);
        assert_eq!(summary.vote_average, None);
        assert_eq!(summary.poster_path, None);
        assert_eq!(summary.budget, Some(55_000_000.0));
    }

    #[test]
    fn test_details_keep_valid_fields_next_to_bad_ones() {
        let details: MovieDetails = serde_json::from_value(json!({
            "title": "Ronin",
            "overview": "A freelancing former US intelligence agent",
            "revenue": {"usd": 41610884},
            "vote_count": "many"
        }))
        .unwrap();

        assert_eq!(
            details.overview.as_deref(),
            Some("A freelancing former US intelligence agent")
        );
        assert_eq!(details.revenue, None);
        assert_eq!(details.vote_count, None);
    }
}
