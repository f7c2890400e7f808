use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of a user's rating history, joined against the movie's slug for
/// display purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRating {
    pub movie_id: Uuid,
    pub slug: String,
    pub rating: i32,
}
