use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static SLUG_SANITIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^0-9a-z _\-]").expect("slug pattern is valid"));

/// A movie in the catalog.
///
/// `rating` and `user_rating` are computed at read time from the ratings
/// table and are never persisted on the movie row. `user_rating` is only
/// populated when a caller identity was supplied to the read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Immutable identifier, assigned at creation.
    pub id: Uuid,
    pub title: String,
    pub year_of_release: i32,
    /// At least one genre is required for a movie to pass validation.
    pub genres: Vec<String>,
    /// Live average of all ratings, rounded to one decimal.
    pub rating: Option<f32>,
    /// The calling user's own rating, when a caller id was supplied.
    pub user_rating: Option<i32>,
}

impl Movie {
    /// Build a new movie with a freshly assigned id.
    pub fn new(title: impl Into<String>, year_of_release: i32, genres: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            year_of_release,
            genres,
            rating: None,
            user_rating: None,
        }
    }

    /// The unique, URL-safe lookup key derived from title and release year.
    ///
    /// Derived, not stored on the struct: the persisted slug column always
    /// reflects the current title/year because writes persist this value.
    pub fn slug(&self) -> String {
        let lowered = self.title.to_lowercase();
        let cleaned = SLUG_SANITIZER.replace_all(&lowered, "");
        let dashed = cleaned.trim().replace(' ', "-");
        format!("{dashed}-{}", self.year_of_release)
    }
}
