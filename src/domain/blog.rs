//! Blog post shapes read from the backend.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// A published blog post as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BlogPost {
    /// URL slug, unique per post.
    pub slug: String,
    pub title: String,
    /// Short summary used in feeds.
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BlogPost {
    /// Most recent modification time known for the post.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.updated_at.or(self.published_at)
    }
}

/// Wire shape of a post. Backends disagree on field names, so every
/// spelling is its own field and `BlogPost` picks the first one present.
#[derive(Deserialize)]
struct RawPost {
    slug: String,
    title: String,
    #[serde(default)]
    excerpt: Option<String>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    published_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "publishedAt", deserialize_with = "lenient_timestamp")]
    published_at_camel: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "updatedAt", deserialize_with = "lenient_timestamp")]
    updated_at_camel: Option<DateTime<Utc>>,
}

impl From<RawPost> for BlogPost {
    fn from(raw: RawPost) -> Self {
        Self {
            slug: raw.slug,
            title: raw.title,
            excerpt: raw.excerpt.or(raw.summary).or(raw.description),
            author: raw.author,
            published_at: raw.published_at.or(raw.published_at_camel),
            updated_at: raw.updated_at.or(raw.updated_at_camel),
        }
    }
}

impl<'de> Deserialize<'de> for BlogPost {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        RawPost::deserialize(deserializer).map(BlogPost::from)
    }
}

/// Parse RFC 3339, then naive date-times and plain dates as UTC.
/// Anything else leaves the date unknown rather than failing the post.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// The backend answers listings either as a bare array or wrapped in
/// `{ "posts": [...] }`. Entries are parsed one at a time so a single bad
/// post does not hide the rest.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PostListing {
    Bare(Vec<Value>),
    Wrapped { posts: Vec<Value> },
}

impl PostListing {
    pub fn into_posts(self) -> Vec<BlogPost> {
        let entries = match self {
            PostListing::Bare(entries) | PostListing::Wrapped { posts: entries } => entries,
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<BlogPost>(entry) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping unreadable blog post");
                    None
                }
            })
            .collect()
    }
}
