use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Backend-assigned identifier of a review.
///
/// The API hands out either numeric or string ids depending on the backend,
/// so both are accepted and written back in the same form they arrived in.
/// Two ids are equal when they render to the same text, which lets an id typed
/// on the command line match one that came back from the server.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReviewId {
    Number(u64),
    Signed(i64),
    Text(String),
}

/// Wire forms an id may arrive in
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for ReviewId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => ReviewId::Number(n),
            RawId::Signed(n) => ReviewId::Signed(n),
            // Fractional ids only survive as their textual form
            RawId::Float(f) => ReviewId::Text(f.to_string()),
            RawId::Text(s) => ReviewId::Text(s),
        })
    }
}

impl PartialEq for ReviewId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ReviewId::Number(a), ReviewId::Number(b)) => a == b,
            (ReviewId::Signed(a), ReviewId::Signed(b)) => a == b,
            (ReviewId::Text(a), ReviewId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl Eq for ReviewId {}

impl Hash for ReviewId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewId::Number(n) => write!(f, "{}", n),
            ReviewId::Signed(n) => write!(f, "{}", n),
            ReviewId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for ReviewId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u64>() {
            if n.to_string() == s {
                return Ok(ReviewId::Number(n));
            }
        }
        if let Ok(n) = s.parse::<i64>() {
            if n.to_string() == s {
                return Ok(ReviewId::Signed(n));
            }
        }
        Ok(ReviewId::Text(s.to_string()))
    }
}

impl From<u64> for ReviewId {
    fn from(n: u64) -> Self {
        ReviewId::Number(n)
    }
}

impl From<&str> for ReviewId {
    fn from(s: &str) -> Self {
        ReviewId::Text(s.to_string())
    }
}

/// Everything a user submits about a movie and their review of it.
///
/// This is the body of create and update requests; the server attaches the id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub genre: Vec<String>,
    pub actor: Vec<String>,
    pub poster_url: String,
    pub review_title: String,
    pub review_text: String,
    pub rating: i32,
    pub tags: Vec<String>,
}

/// A stored review record as returned by the API and kept in favorites.
///
/// Fields the server sends beyond the draft (timestamps, owner, ...) are kept
/// in `extra` so a favorite is stored exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    #[serde(flatten)]
    pub details: ReviewDraft,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Review {
    pub fn new(id: impl Into<ReviewId>, details: ReviewDraft) -> Self {
        Self {
            id: id.into(),
            details,
            extra: Map::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    /// One-line listing used by the CLI
    pub fn summary_line(&self) -> String {
        format!(
            "[{}] {} ({}) - {} - {}/10",
            self.id, self.details.title, self.details.year, self.details.director, self.details.rating
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_json_shape() {
        let json = r#"{
            "id": 7,
            "title": "Alien",
            "year": 1979,
            "director": "Ridley Scott",
            "genre": ["Horror", "Sci-Fi"],
            "actor": ["Sigourney Weaver"],
            "posterUrl": "https://example.com/alien.jpg",
            "reviewTitle": "In space",
            "reviewText": "Nobody can hear you scream.",
            "rating": 9,
            "tags": ["classic"]
        }"#;

        let review: Review = serde_json::from_str(json).unwrap();
        assert_eq!(review.id, ReviewId::Number(7));
        assert_eq!(review.details.poster_url, "https://example.com/alien.jpg");
        assert_eq!(review.details.genre, vec!["Horror", "Sci-Fi"]);

        let value = serde_json::to_value(&review).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["reviewTitle"], "In space");
        assert!(value.get("details").is_none());
    }

    #[test]
    fn test_string_ids_are_kept() {
        let review: Review = serde_json::from_str(
            r#"{"id":"a1b2","title":"Heat","year":1995,"director":"Michael Mann",
                "genre":["Crime"],"actor":["Al Pacino"],"posterUrl":"https://x.io/h.png",
                "reviewTitle":"LA","reviewText":"Long and great.","rating":8,"tags":["heist"]}"#,
        )
        .unwrap();
        assert_eq!(review.id, ReviewId::Text("a1b2".to_string()));
        assert_eq!(serde_json::to_value(&review).unwrap()["id"], "a1b2");
    }

    #[test]
    fn test_id_equality_across_forms() {
        assert_eq!(ReviewId::Number(12), ReviewId::Text("12".to_string()));
        assert_ne!(ReviewId::Number(12), ReviewId::Text("012".to_string()));
        assert_ne!(ReviewId::Number(1), ReviewId::Number(2));
        assert_eq!("42".parse::<ReviewId>().unwrap(), ReviewId::Number(42));
        assert_eq!(
            "abc".parse::<ReviewId>().unwrap(),
            ReviewId::Text("abc".to_string())
        );
        assert_eq!("-3".parse::<ReviewId>().unwrap(), ReviewId::Signed(-3));
        assert_eq!(ReviewId::Signed(-3), ReviewId::Text("-3".to_string()));
    }

    #[test]
    fn test_negative_and_fractional_ids_decode() {
        let ids: Vec<ReviewId> = serde_json::from_str(r#"[-4, 2.5, 8, "x"]"#).unwrap();
        assert_eq!(ids[0], ReviewId::Signed(-4));
        assert_eq!(ids[1], ReviewId::Text("2.5".to_string()));
        assert_eq!(ids[2], ReviewId::Number(8));
        assert_eq!(serde_json::to_value(&ids[0]).unwrap(), -4);
    }

    #[test]
    fn test_unknown_server_fields_round_trip() {
        let json = serde_json::json!({
            "id": 3,
            "title": "Heat",
            "year": 1995,
            "director": "Michael Mann",
            "genre": ["Crime"],
            "actor": ["Al Pacino"],
            "posterUrl": "https://x.io/h.png",
            "reviewTitle": "LA",
            "reviewText": "Long and great.",
            "rating": 8,
            "tags": ["heist"],
            "createdAt": "2024-01-02T03:04:05Z",
            "likes": 12
        });

        let review: Review = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(review.extra.len(), 2);
        assert_eq!(review.extra["likes"], 12);
        assert!(!review.extra.contains_key("title"));
        assert_eq!(serde_json::to_value(&review).unwrap(), json);
    }
}
