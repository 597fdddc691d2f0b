use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::Review;

/// Field a catalog search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Title,
    Director,
    Genre,
    Year,
}

impl SearchField {
    fn value_of(self, review: &Review) -> String {
        match self {
            SearchField::Title => review.details.title.clone(),
            SearchField::Director => review.details.director.clone(),
            SearchField::Genre => review.details.genre.join(","),
            SearchField::Year => review.details.year.to_string(),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SearchField::Title => "title",
            SearchField::Director => "director",
            SearchField::Genre => "genre",
            SearchField::Year => "year",
        };
        f.write_str(name)
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "title" => Ok(SearchField::Title),
            "director" => Ok(SearchField::Director),
            "genre" => Ok(SearchField::Genre),
            "year" => Ok(SearchField::Year),
            other => Err(format!(
                "Unknown search field '{}', expected title, director, genre or year",
                other
            )),
        }
    }
}

/// Keep reviews whose chosen field contains `query`, ignoring case
pub fn filter_reviews<'a>(
    reviews: &'a [Review],
    query: &str,
    field: SearchField,
) -> Vec<&'a Review> {
    let query = query.to_lowercase();
    reviews
        .iter()
        .filter(|review| field.value_of(review).to_lowercase().contains(&query))
        .collect()
}
