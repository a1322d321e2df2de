// Song feed response types.
// Defines the song record as delivered by the feed and cached by the store.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A song record from the feed.
///
/// Fields the feed sends beyond the ones we display are kept in `extra`, so
/// the cached record is the whole record the feed delivered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(default, deserialize_with = "id_text")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub title: String,
    #[serde(default, deserialize_with = "nullable_text")]
    pub artist: String,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default, deserialize_with = "nullable_text")]
    pub created_at: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Song {
    /// Create a song with no extra feed fields.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: Option<&str>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: album.map(str::to_string),
            created_at: created_at.into(),
            extra: Map::new(),
        }
    }

    /// Check whether the title or artist contains an already-lowercased term.
    pub fn matches(&self, term_lower: &str) -> bool {
        self.title.to_lowercase().contains(term_lower)
            || self.artist.to_lowercase().contains(term_lower)
    }

    /// Release date derived from `created_at`, e.g. "1/31/2024".
    pub fn release_date(&self) -> String {
        parse_created_at(&self.created_at)
            .map(|date| date.format("%-m/%-d/%Y").to_string())
            .unwrap_or_else(|| "Invalid Date".to_string())
    }
}

/// One page of the song feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<Song>,
}

/// Parse the loosely formatted feed timestamp into a calendar date (UTC).
fn parse_created_at(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Identifiers arrive as strings or integers; both key the same record.
/// A null id becomes empty text, which the store rejects on write.
fn id_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(text)) => text,
        Some(Id::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

fn nullable_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feed_page() {
        let json = r#"{
            "items": [
                {"id": 1, "title": "Ocean Waves", "artist": "Aria", "album": "Calm", "created_at": "2024-01-01"},
                {"id": "abc-123", "title": "Night Drive", "artist": "Vex", "album": null,
                 "created_at": "2024-03-05T18:22:10.123Z", "play_count": 12}
            ],
            "num_total_results": 2
        }"#;

        let page: FeedPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.items.len(), 2);

        let first = &page.items[0];
        assert_eq!(first.id, "1");
        assert_eq!(first.album.as_deref(), Some("Calm"));
        assert!(first.extra.is_empty());

        let second = &page.items[1];
        assert_eq!(second.id, "abc-123");
        assert_eq!(second.album, None);
        assert_eq!(second.extra.get("play_count"), Some(&Value::from(12)));
    }

    #[test]
    fn test_missing_items_is_error() {
        let result: Result<FeedPage, _> = serde_json::from_str(r#"{"songs": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_null_or_missing_id_decodes_as_empty() {
        let page: FeedPage = serde_json::from_str(
            r#"{"items": [
                {"id": "1", "title": "Ocean Waves", "artist": "Aria"},
                {"id": null, "title": "Null Id", "artist": "Nobody"},
                {"title": "No Id", "artist": "Nobody"}
            ]}"#,
        )
        .unwrap();

        let ids: Vec<&str> = page.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "", ""]);
    }

    #[test]
    fn test_null_text_fields_default_to_empty() {
        let song: Song =
            serde_json::from_str(r#"{"id": "x", "title": null, "created_at": "2024-01-01"}"#)
                .unwrap();
        assert_eq!(song.title, "");
        assert_eq!(song.artist, "");
    }

    #[test]
    fn test_extra_fields_survive_serialization() {
        let song: Song =
            serde_json::from_str(r#"{"id": "x", "title": "T", "artist": "A", "image_url": "u"}"#)
                .unwrap();
        let json = serde_json::to_value(&song).unwrap();
        assert_eq!(json["image_url"], "u");
        assert_eq!(json["title"], "T");
    }

    #[test]
    fn test_release_date_formats() {
        let date_only = Song::new("1", "t", "a", None, "2024-01-01");
        assert_eq!(date_only.release_date(), "1/1/2024");

        let rfc3339 = Song::new("2", "t", "a", None, "2024-11-23T23:59:00+00:00");
        assert_eq!(rfc3339.release_date(), "11/23/2024");

        let naive = Song::new("3", "t", "a", None, "2023-07-04T08:15:30.500");
        assert_eq!(naive.release_date(), "7/4/2023");

        let garbage = Song::new("4", "t", "a", None, "yesterday");
        assert_eq!(garbage.release_date(), "Invalid Date");
    }

    #[test]
    fn test_matches_title_or_artist() {
        let song = Song::new("1", "Ocean Waves", "ARIA", None, "2024-01-01");
        assert!(song.matches("ocean"));
        assert!(song.matches("aria"));
        assert!(song.matches("n w"));
        assert!(!song.matches("fire"));
    }
}
