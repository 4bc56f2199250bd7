//! Album search and detail screen.

use tracing::error;

use crate::api::NotifyApi;
use crate::models::{AlbumDetail, AlbumSummary};

pub const SEARCH_FAILED: &str = "Error searching albums. Please try again.";
pub const DETAIL_FAILED: &str = "Error fetching album information. Please try again.";

/// State of the search screen.
#[derive(Debug, Clone, Default)]
pub struct SearchView {
    query: String,
    results: Vec<AlbumSummary>,
    selected: Option<AlbumDetail>,
    loading: bool,
    loading_detail: bool,
    error: Option<String>,
}

impl SearchView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a search for `input`. Blank input clears the results without
    /// touching the network.
    pub async fn search(&mut self, api: &NotifyApi, input: &str) {
        let query = input.trim();
        self.query = query.to_string();

        if query.is_empty() {
            self.results.clear();
            self.error = None;
            return;
        }

        self.loading = true;
        self.error = None;

        match api.search_albums(query).await {
            Ok(albums) => {
                self.results = albums.iter().map(|a| a.summary()).collect();
            }
            Err(e) => {
                error!("Album search failed: {}", e);
                self.error = Some(SEARCH_FAILED.to_string());
                self.results.clear();
            }
        }
        self.loading = false;
    }

    /// Load the detail screen for one album.
    pub async fn select(&mut self, api: &NotifyApi, artist: &str, title: &str) {
        self.loading_detail = true;
        self.error = None;

        match api.get_album(artist, title).await {
            Ok(album) => self.selected = Some(album.detail()),
            Err(e) => {
                error!("Album lookup failed: {}", e);
                self.error = Some(DETAIL_FAILED.to_string());
            }
        }
        self.loading_detail = false;
    }

    /// Go back from the detail screen to the result list.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.error = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Message for an empty result list, or `None` when there is
    /// something else to show.
    pub fn empty_state(&self) -> Option<String> {
        if self.loading || self.error.is_some() || !self.results.is_empty() {
            return None;
        }
        if self.query.is_empty() {
            Some("Start searching to see results.".to_string())
        } else {
            Some(format!("No albums found for \"{}\".", self.query))
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[AlbumSummary] {
        &self.results
    }

    pub fn selected(&self) -> Option<&AlbumDetail> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading || self.loading_detail
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
