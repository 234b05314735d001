use serde::{Deserialize, Serialize};

/// Screen the front end is currently showing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    #[default]
    Home,
    ContentBased,
    Explore,
    MovieDetails,
    About,
}

/// Loading, error and navigation state shown alongside results
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UiState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_view: View,
    pub selected_movie: Option<String>,
}
