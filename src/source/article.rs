//! The core data types shared by every news source.
//!
//! `Article` is a single entry from a search or headline page and
//! `NewsResponse` is one page (or an accumulation of pages) as the API
//! reports it.  The field names follow the wire payload:
//!
//! ```text
//! { status, totalResults, articles: [ { source: { name }, title,
//!   description, url, urlToImage, publishedAt } ] }
//! ```
//!
//! ## Identity
//!
//! An article is identified by its `url`.  Two values with the same URL are
//! "the same item" for list diffing even when other fields differ; see
//! [`crate::diff`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Publisher of an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A single article, normalised from the API payload.
///
/// Immutable once fetched, apart from the local `favorited` marker which
/// only the favourites store toggles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub source: ArticleSource,

    #[serde(default)]
    pub author: Option<String>,

    /// Headline text.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Link to the full story.  Also the identity key.
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default)]
    pub url_to_image: Option<String>,

    /// Publication timestamp exactly as the API sent it (RFC 3339).
    #[serde(default, deserialize_with = "null_as_default")]
    pub published_at: String,

    #[serde(default)]
    pub content: Option<String>,

    /// Set by the favourites store; never part of the wire format.
    #[serde(skip)]
    pub favorited: bool,
}

impl Article {
    /// Identity key used for de-duplication and diffing.
    pub fn key(&self) -> &str {
        &self.url
    }

    /// Parsed publication time, `None` when the API sent something that is
    /// not RFC 3339.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// One page of results, or the running accumulation of several pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Total hits the API reported.  In an accumulation this is frozen at
    /// the first page's value.
    #[serde(default)]
    pub total_results: u32,
}

/// NewsAPI sends explicit `null` for missing strings; treat it like absence.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn deserializes_wire_payload() {
        let json = r#"{
            "status": "ok",
            "totalResults": 1000,
            "articles": [{
                "source": { "id": "bbc-news", "name": "BBC News" },
                "author": null,
                "title": "First",
                "description": "Something happened",
                "url": "https://example.com/1",
                "urlToImage": "https://example.com/1.jpg",
                "publishedAt": "2024-01-01T12:30:00Z",
                "content": null
            }]
        }"#;

        let response: NewsResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.status, "ok");
        assert_eq!(response.total_results, 1000);
        assert_eq!(response.articles.len(), 1);

        let article = &response.articles[0];
        assert_eq!(article.source.name, "BBC News");
        assert_eq!(article.key(), "https://example.com/1");
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/1.jpg"));
        assert!(article.author.is_none());
        assert!(!article.favorited);
    }

    #[test]
    fn nulls_become_empty_strings() {
        let json = r#"{ "source": { "id": null, "name": null }, "title": null,
                        "url": "https://example.com/x", "publishedAt": null }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.title, "");
        assert_eq!(article.source.name, "");
        assert_eq!(article.published_at, "");
    }

    #[test]
    fn favorited_is_not_serialized() {
        let article = Article {
            url: "https://example.com/fav".into(),
            favorited: true,
            ..Article::default()
        };
        let json = serde_json::to_string(&article).unwrap();
        assert!(!json.contains("favorited"));
    }

    #[test]
    fn published_parses_rfc3339() {
        let article = Article {
            published_at: "2025-06-01T08:00:00Z".into(),
            ..Article::default()
        };
        assert_eq!(
            article.published(),
            Some(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
        );

        let bad = Article {
            published_at: "yesterday".into(),
            ..Article::default()
        };
        assert!(bad.published().is_none());
    }
}
