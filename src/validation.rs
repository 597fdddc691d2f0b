use std::fmt;

use chrono::{Datelike, Utc};
use reqwest::Url;
use serde::Deserialize;

use crate::models::ReviewDraft;

pub const MIN_YEAR: i32 = 1900;
pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 10;
pub const MIN_REVIEW_TEXT_CHARS: usize = 10;
pub const MAX_REVIEW_TEXT_CHARS: usize = 1000;

/// A single rejected field, keyed by its JSON name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All problems found in a review draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid review:")?;
        for e in &self.errors {
            write!(f, "\n  {}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A review as submitted by the user, before required fields are known to exist
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewForm {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub genre: Option<Vec<String>>,
    pub actor: Option<Vec<String>>,
    pub poster_url: Option<String>,
    pub review_title: Option<String>,
    pub review_text: Option<String>,
    pub rating: Option<i32>,
    pub tags: Option<Vec<String>>,
}

/// Validate a submitted form against the current calendar year
pub fn validate_form(form: ReviewForm) -> Result<ReviewDraft, ValidationError> {
    validate_form_for_year(form, Utc::now().year())
}

/// Report every absent field as required, then apply the draft checks to the rest
pub fn validate_form_for_year(form: ReviewForm, current_year: i32) -> Result<ReviewDraft, ValidationError> {
    let mut missing = Vec::new();

    let draft = ReviewDraft {
        title: required(form.title, "title", "The title is required", &mut missing),
        year: required(form.year, "year", "The year is required", &mut missing),
        director: required(form.director, "director", "The director is required", &mut missing),
        genre: required(form.genre, "genre", "At least one genre is required", &mut missing),
        actor: required(form.actor, "actor", "At least one actor is required", &mut missing),
        poster_url: required(form.poster_url, "posterUrl", "The poster is required", &mut missing),
        review_title: required(
            form.review_title,
            "reviewTitle",
            "The review's title is required",
            &mut missing,
        ),
        review_text: required(
            form.review_text,
            "reviewText",
            "The review's description is required",
            &mut missing,
        ),
        rating: required(form.rating, "rating", "The rating is required", &mut missing),
        tags: required(form.tags, "tags", "At least one tag is required", &mut missing),
    };

    match validate_for_year(draft, current_year) {
        Ok(draft) if missing.is_empty() => Ok(draft),
        Ok(_) => Err(ValidationError { errors: missing }),
        Err(found) => {
            let mut errors = missing;
            let rest: Vec<FieldError> = found
                .errors
                .into_iter()
                .filter(|e| !errors.iter().any(|m| m.field == e.field))
                .collect();
            errors.extend(rest);
            Err(ValidationError { errors })
        }
    }
}

fn required<T: Default>(
    value: Option<T>,
    field: &'static str,
    message: &str,
    missing: &mut Vec<FieldError>,
) -> T {
    value.unwrap_or_else(|| {
        missing.push(FieldError {
            field,
            message: message.to_string(),
        });
        T::default()
    })
}

/// Validate a draft against the current calendar year
pub fn validate(draft: ReviewDraft) -> Result<ReviewDraft, ValidationError> {
    validate_for_year(draft, Utc::now().year())
}

/// Trim every text field of the draft and check it.
///
/// Returns the trimmed draft, or every failing field at once.
pub fn validate_for_year(draft: ReviewDraft, current_year: i32) -> Result<ReviewDraft, ValidationError> {
    let draft = trimmed(draft);
    let mut errors = Vec::new();
    let mut reject = |field: &'static str, message: &str| {
        errors.push(FieldError {
            field,
            message: message.to_string(),
        })
    };

    if draft.title.is_empty() {
        reject("title", "The title is required");
    }

    if draft.year < MIN_YEAR {
        reject("year", "Year must be greater than or equal to 1900");
    } else if draft.year > current_year {
        reject("year", "Year must not be in the future");
    }

    if draft.director.is_empty() {
        reject("director", "The director is required");
    }

    check_list(&draft.genre, "genre", "At least one genre is required", &mut reject);
    check_list(&draft.actor, "actor", "At least one actor is required", &mut reject);

    if draft.poster_url.is_empty() {
        reject("posterUrl", "The poster is required");
    } else if !is_web_url(&draft.poster_url) {
        reject("posterUrl", "The poster has to be a valid URL");
    }

    if draft.review_title.is_empty() {
        reject("reviewTitle", "The review's title is required");
    }

    let text_len = draft.review_text.chars().count();
    if text_len == 0 {
        reject("reviewText", "The review's description is required");
    } else if text_len < MIN_REVIEW_TEXT_CHARS {
        reject("reviewText", "The description should consist of at least 10 symbols");
    } else if text_len > MAX_REVIEW_TEXT_CHARS {
        reject("reviewText", "The description should consist of at most 1000 symbols");
    }

    if draft.rating < MIN_RATING {
        reject("rating", "Rating must be at least 0");
    } else if draft.rating > MAX_RATING {
        reject("rating", "Rating cannot exceed 10");
    }

    check_list(&draft.tags, "tags", "At least one tag is required", &mut reject);

    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(ValidationError { errors })
    }
}

fn check_list(
    items: &[String],
    field: &'static str,
    empty_message: &str,
    reject: &mut impl FnMut(&'static str, &str),
) {
    if items.is_empty() {
        reject(field, empty_message);
    } else if items.iter().any(|item| item.is_empty()) {
        reject(field, "Entries must not be blank");
    }
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}

fn trimmed(draft: ReviewDraft) -> ReviewDraft {
    let trim = |s: String| s.trim().to_string();
    let trim_all = |items: Vec<String>| -> Vec<String> { items.into_iter().map(trim).collect() };

    ReviewDraft {
        title: trim(draft.title),
        year: draft.year,
        director: trim(draft.director),
        genre: trim_all(draft.genre),
        actor: trim_all(draft.actor),
        poster_url: trim(draft.poster_url),
        review_title: trim(draft.review_title),
        review_text: trim(draft.review_text),
        rating: draft.rating,
        tags: trim_all(draft.tags),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ReviewDraft {
        ReviewDraft {
            title: "  The Thing ".to_string(),
            year: 1982,
            director: "John Carpenter".to_string(),
            genre: vec![" Horror ".to_string()],
            actor: vec!["Kurt Russell".to_string()],
            poster_url: " https://example.com/thing.jpg ".to_string(),
            review_title: "Paranoia on ice".to_string(),
            review_text: "Trust nobody, not even the dog.".to_string(),
            rating: 9,
            tags: vec!["practical effects".to_string()],
        }
    }

    #[test]
    fn test_valid_draft_is_trimmed() {
        let result = validate_for_year(draft(), 2024).unwrap();
        assert_eq!(result.title, "The Thing");
        assert_eq!(result.genre, vec!["Horror"]);
        assert_eq!(result.poster_url, "https://example.com/thing.jpg");
    }

    #[test]
    fn test_rating_bounds() {
        let mut d = draft();
        d.rating = 11;
        let err = validate_for_year(d, 2024).unwrap_err();
        assert!(err.has_field("rating"));

        let mut d = draft();
        d.rating = 10;
        assert!(validate_for_year(d, 2024).is_ok());

        let mut d = draft();
        d.rating = -1;
        assert!(validate_for_year(d, 2024).unwrap_err().has_field("rating"));
    }

    #[test]
    fn test_year_bounds() {
        let mut d = draft();
        d.year = 1899;
        assert!(validate_for_year(d, 2024).unwrap_err().has_field("year"));

        let mut d = draft();
        d.year = 2024;
        assert!(validate_for_year(d, 2024).is_ok());

        let mut d = draft();
        d.year = 2025;
        assert!(validate_for_year(d, 2024).unwrap_err().has_field("year"));
    }

    #[test]
    fn test_current_year_accepted() {
        let mut d = draft();
        d.year = Utc::now().year();
        assert!(validate(d).is_ok());
    }

    #[test]
    fn test_blank_fields_collected_together() {
        let d = ReviewDraft {
            title: "   ".to_string(),
            genre: vec![],
            actor: vec!["  ".to_string()],
            poster_url: "not a url".to_string(),
            review_text: "short".to_string(),
            ..draft()
        };

        let err = validate_for_year(d, 2024).unwrap_err();
        for field in ["title", "genre", "actor", "posterUrl", "reviewText"] {
            assert!(err.has_field(field), "expected error on {}", field);
        }
        assert!(!err.has_field("rating"));
    }

    fn form_json() -> serde_json::Value {
        serde_json::json!({
            "title": "Alien",
            "year": 1979,
            "director": "Ridley Scott",
            "genre": ["Horror"],
            "actor": ["Sigourney Weaver"],
            "posterUrl": "https://example.com/alien.jpg",
            "reviewTitle": "In space",
            "reviewText": "Nobody can hear you scream.",
            "rating": 9,
            "tags": ["classic"]
        })
    }

    #[test]
    fn test_complete_form_becomes_draft() {
        let form: ReviewForm = serde_json::from_value(form_json()).unwrap();
        let draft = validate_form_for_year(form, 2024).unwrap();
        assert_eq!(draft.title, "Alien");
        assert_eq!(draft.rating, 9);
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let mut value = form_json();
        let object = value.as_object_mut().unwrap();
        for field in ["title", "rating", "genre", "year"] {
            object.remove(field);
        }

        let form: ReviewForm = serde_json::from_value(value).unwrap();
        let err = validate_form_for_year(form, 2024).unwrap_err();

        for field in ["title", "rating", "genre", "year"] {
            assert!(err.has_field(field), "expected error on {}", field);
        }
        assert!(!err.has_field("director"));
        let year_errors: Vec<_> = err.errors.iter().filter(|e| e.field == "year").collect();
        assert_eq!(year_errors.len(), 1);
        assert_eq!(year_errors[0].message, "The year is required");
    }

    #[test]
    fn test_missing_and_invalid_fields_collected_together() {
        let mut value = form_json();
        let object = value.as_object_mut().unwrap();
        object.remove("title");
        object.insert("rating".to_string(), serde_json::json!(11));

        let form: ReviewForm = serde_json::from_value(value).unwrap();
        let err = validate_form_for_year(form, 2024).unwrap_err();

        assert!(err.has_field("title"));
        assert!(err.has_field("rating"));
    }

    #[test]
    fn test_empty_form_rejects_everything() {
        let err = validate_form_for_year(ReviewForm::default(), 2024).unwrap_err();
        assert_eq!(err.errors.len(), 10);
    }

    #[test]
    fn test_review_text_length() {
        let mut d = draft();
        d.review_text = "x".repeat(1000);
        assert!(validate_for_year(d, 2024).is_ok());

        let mut d = draft();
        d.review_text = "x".repeat(1001);
        assert!(validate_for_year(d, 2024).unwrap_err().has_field("reviewText"));
    }

    #[test]
    fn test_poster_url_requires_web_scheme() {
        let mut d = draft();
        d.poster_url = "ftp://example.com/a.jpg".to_string();
        assert!(validate_for_year(d, 2024).unwrap_err().has_field("posterUrl"));
    }
}
