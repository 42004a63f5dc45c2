//! Item model for the Hacker News Firebase API.
//!
//! The API serves one `item` shape for everything (stories, comments, jobs,
//! polls) and omits any field it has no value for. Deleted items in
//! particular keep only `id`, `deleted`, and sometimes `time`/`kids`, so
//! every non-id field here tolerates absence.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// Story feed categories, one per listing endpoint.
///
/// `as_str` yields the endpoint prefix: `{prefix}stories.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    #[serde(alias = "newest")]
    New,
    Best,
    Ask,
    Show,
    #[serde(alias = "jobs")]
    Job,
}

impl Category {
    /// All categories in display order (keys 1-6 in the UI).
    pub const ALL: [Category; 6] = [
        Category::Top,
        Category::New,
        Category::Best,
        Category::Ask,
        Category::Show,
        Category::Job,
    ];

    /// Endpoint prefix for the listing URL.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Top => "top",
            Category::New => "new",
            Category::Best => "best",
            Category::Ask => "ask",
            Category::Show => "show",
            Category::Job => "job",
        }
    }

    /// Human-readable tab label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Top => "Top",
            Category::New => "Newest",
            Category::Best => "Best",
            Category::Ask => "Ask",
            Category::Show => "Show",
            Category::Job => "Jobs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Accepts the endpoint names plus the aliases the web frontend used
    /// as routes ("newest", "jobs").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Category::Top),
            "new" | "newest" => Ok(Category::New),
            "best" => Ok(Category::Best),
            "ask" => Ok(Category::Ask),
            "show" => Ok(Category::Show),
            "job" | "jobs" => Ok(Category::Job),
            other => Err(format!(
                "unknown category '{}' (expected top, new, best, ask, show, or job)",
                other
            )),
        }
    }
}

/// The API's `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    #[default]
    Story,
    Job,
    Poll,
    PollOpt,
    Comment,
}

/// A listed submission: story, job posting, or poll.
///
/// `kids` is in author-defined order, which is also display order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Story {
    pub id: u64,
    #[serde(default)]
    pub by: String,
    #[serde(default)]
    pub score: i64,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub title: String,
    pub url: Option<String>,
    /// Top-level comment ids in display order. Empty when the API omits it.
    #[serde(default)]
    pub kids: Vec<u64>,
    #[serde(default)]
    pub time: i64,
    /// Total count of nested replies, transitively.
    #[serde(default)]
    pub descendants: u32,
    /// Self-post body (Ask HN, job descriptions), as an HTML fragment.
    pub text: Option<String>,
}

/// A single comment node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Comment {
    pub id: u64,
    /// Deleted comments keep their slot in the parent's `kids` but render
    /// nothing and usually carry no other fields.
    #[serde(default)]
    pub deleted: bool,
    /// Direct reply ids in display order. Empty when the API omits it.
    #[serde(default)]
    pub kids: Vec<u64>,
    pub by: Option<String>,
    /// Comment body as an HTML fragment.
    pub text: Option<String>,
    pub time: Option<i64>,
    #[serde(default)]
    pub descendants: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn story_parses_full_item() {
        let json = r#"{
            "by": "dhouston",
            "descendants": 71,
            "id": 8863,
            "kids": [9224, 8917, 8952],
            "score": 104,
            "time": 1175714200,
            "title": "My YC app: Dropbox",
            "type": "story",
            "url": "http://www.getdropbox.com/u/2/screencast.html"
        }"#;

        let story: Story = serde_json::from_str(json).unwrap();
        assert_eq!(story.id, 8863);
        assert_eq!(story.kind, ItemKind::Story);
        assert_eq!(story.kids, vec![9224, 8917, 8952]);
        assert_eq!(story.descendants, 71);
        assert!(story.text.is_none());
    }

    #[test]
    fn story_without_url_or_kids() {
        // Ask HN posts have text but no url; fresh posts have no kids yet.
        let json = r#"{
            "by": "pg",
            "id": 1,
            "score": 10,
            "time": 1160418111,
            "title": "Ask HN: something",
            "type": "story",
            "text": "<p>body"
        }"#;

        let story: Story = serde_json::from_str(json).unwrap();
        assert!(story.url.is_none());
        assert!(story.kids.is_empty());
        assert_eq!(story.descendants, 0);
        assert_eq!(story.text.as_deref(), Some("<p>body"));
    }

    #[test]
    fn comment_parses_with_replies() {
        let json = r#"{
            "by": "norvig",
            "id": 2921983,
            "kids": [2922097, 2922429],
            "text": "Aw shucks",
            "time": 1314211127,
            "type": "comment"
        }"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert!(!comment.deleted);
        assert_eq!(comment.kids, vec![2922097, 2922429]);
        assert_eq!(comment.by.as_deref(), Some("norvig"));
    }

    #[test]
    fn deleted_comment_parses_with_only_id() {
        let json = r#"{"deleted": true, "id": 999, "type": "comment"}"#;

        let comment: Comment = serde_json::from_str(json).unwrap();
        assert!(comment.deleted);
        assert!(comment.by.is_none());
        assert!(comment.text.is_none());
        assert!(comment.kids.is_empty());
    }

    #[test]
    fn category_round_trips_endpoint_names() {
        for cat in Category::ALL {
            assert_eq!(cat.as_str().parse::<Category>().unwrap(), cat);
        }
    }

    #[test]
    fn category_accepts_route_aliases() {
        assert_eq!("newest".parse::<Category>().unwrap(), Category::New);
        assert_eq!("jobs".parse::<Category>().unwrap(), Category::Job);
        assert_eq!("TOP".parse::<Category>().unwrap(), Category::Top);
        assert!("frontpage".parse::<Category>().is_err());
    }
}
