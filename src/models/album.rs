//! Album-related models.
//!
//! The backend speaks Spanish field names on the wire; the Rust side uses
//! English names and serde renames.

use serde::{Deserialize, Serialize};

use super::common::{format_number, format_release_date, lenient_count, string_or_null};

/// Placeholder shown when an album has no description.
pub const NO_DESCRIPTION: &str = "No description available.";

/// A full album record as returned by the lookup endpoints.
///
/// Search results usually carry only title, artist and cover; every other
/// field defaults when missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Album {
    /// Album title.
    #[serde(rename = "titulo", default, deserialize_with = "string_or_null")]
    pub title: String,

    /// Artist name.
    #[serde(rename = "artista", default, deserialize_with = "string_or_null")]
    pub artist: String,

    /// Release date as sent by the backend, e.g. `"01 Jan 2001"`.
    #[serde(
        rename = "fechaLanzamiento",
        default,
        deserialize_with = "string_or_null"
    )]
    pub release_date: String,

    /// Total play count.
    #[serde(rename = "reproducciones", default, deserialize_with = "lenient_count")]
    pub play_count: u64,

    /// Number of distinct listeners.
    #[serde(rename = "oyentes", default, deserialize_with = "lenient_count")]
    pub listeners: u64,

    /// Free-text description.
    #[serde(rename = "info", default, deserialize_with = "string_or_null")]
    pub description: String,

    /// Number of tracks.
    #[serde(
        rename = "cantidadCanciones",
        default,
        deserialize_with = "lenient_count"
    )]
    pub track_count: u64,

    /// Cover image URL.
    #[serde(rename = "foto", default, deserialize_with = "string_or_null")]
    pub cover_url: String,

    /// Comma-separated tags.
    #[serde(rename = "etiquetas", default, deserialize_with = "string_or_null")]
    pub tags: String,

    /// Total length in seconds.
    #[serde(rename = "duracion", default, deserialize_with = "lenient_count")]
    pub duration_secs: u64,
}

impl Album {
    /// Project to the list-row shape.
    pub fn summary(&self) -> AlbumSummary {
        AlbumSummary {
            title: self.title.clone(),
            artist: self.artist.clone(),
            cover_url: self.cover_url.clone(),
        }
    }

    /// Project to the display-ready detail shape.
    pub fn detail(&self) -> AlbumDetail {
        let description = if self.description.trim().is_empty() {
            NO_DESCRIPTION.to_string()
        } else {
            self.description.clone()
        };

        AlbumDetail {
            title: self.title.clone(),
            artist: self.artist.clone(),
            cover_url: self.cover_url.clone(),
            release_date: format_release_date(&self.release_date),
            play_count: format_number(self.play_count),
            listeners: format_number(self.listeners),
            description,
            track_count: self.track_count,
            tags: self.tag_list().into_iter().map(str::to_string).collect(),
            duration: (self.duration_secs > 0).then(|| self.duration_formatted()),
        }
    }

    /// Tags split on commas, trimmed, empties removed.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Total length formatted as MM:SS, or H:MM:SS from one hour up.
    pub fn duration_formatted(&self) -> String {
        let hours = self.duration_secs / 3600;
        let minutes = (self.duration_secs % 3600) / 60;
        let seconds = self.duration_secs % 60;
        if hours > 0 {
            format!("{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            format!("{:02}:{:02}", minutes, seconds)
        }
    }
}

/// Album as shown in a result list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumSummary {
    pub title: String,
    pub artist: String,
    pub cover_url: String,
}

/// Album as shown on the detail screen, with counts and date already
/// formatted for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumDetail {
    pub title: String,
    pub artist: String,
    pub cover_url: String,
    pub release_date: String,
    pub play_count: String,
    pub listeners: String,
    pub description: String,
    pub track_count: u64,
    pub tags: Vec<String>,
    /// `None` when the backend did not report a length.
    pub duration: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::NO_RELEASE_DATE;
    use serde_json::json;

    #[test]
    fn test_album_from_backend_json() {
        let album: Album = serde_json::from_value(json!({
            "titulo": "Discovery",
            "artista": "Daft Punk",
            "fechaLanzamiento": "12 Mar 2001",
            "reproducciones": "51234567",
            "oyentes": 2345678,
            "info": "Second studio album.",
            "cantidadCanciones": 14,
            "foto": "https://img.example/discovery.png",
            "etiquetas": "electronic, house,",
            "duracion": 3672
        }))
        .unwrap();

        assert_eq!(album.title, "Discovery");
        assert_eq!(album.play_count, 51234567);
        assert_eq!(album.listeners, 2345678);
        assert_eq!(album.tag_list(), vec!["electronic", "house"]);
        assert_eq!(album.duration_formatted(), "1:01:12");
    }

    #[test]
    fn test_search_row_with_missing_fields() {
        let album: Album = serde_json::from_value(json!({
            "titulo": "Homework",
            "artista": "Daft Punk",
            "foto": null
        }))
        .unwrap();

        let summary = album.summary();
        assert_eq!(summary.title, "Homework");
        assert_eq!(summary.cover_url, "");
        assert_eq!(album.track_count, 0);
    }

    #[test]
    fn test_detail_formatting() {
        let album = Album {
            title: "Discovery".to_string(),
            artist: "Daft Punk".to_string(),
            release_date: "12 Mar 2001".to_string(),
            play_count: 51234567,
            listeners: 999,
            ..Default::default()
        };

        let detail = album.detail();
        assert_eq!(detail.release_date, "March 12, 2001");
        assert_eq!(detail.play_count, "51,234,567");
        assert_eq!(detail.listeners, "999");
        assert_eq!(detail.description, NO_DESCRIPTION);
        assert_eq!(detail.track_count, 0);
        assert!(detail.tags.is_empty());
        assert_eq!(detail.duration, None);
    }

    #[test]
    fn test_detail_carries_tags_and_duration() {
        let album = Album {
            tags: "french house, electronic,,".to_string(),
            duration_secs: 3672,
            ..Default::default()
        };

        let detail = album.detail();
        assert_eq!(detail.tags, vec!["french house", "electronic"]);
        assert_eq!(detail.duration.as_deref(), Some("1:01:12"));
    }

    #[test]
    fn test_detail_without_release_date() {
        let detail = Album::default().detail();
        assert_eq!(detail.release_date, NO_RELEASE_DATE);
    }
}
