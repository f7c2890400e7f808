use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::MovieRating;
use crate::error::Result;

/// Per-(movie, user) rating rows. At most one row per pair.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Insert or overwrite the user's rating for the movie.
    ///
    /// Expressed as a single atomic insert-or-update so two concurrent raters
    /// can never lose an update or produce duplicate rows.
    async fn rate_movie(&self, movie_id: Uuid, user_id: Uuid, rating: i32) -> Result<()>;

    /// Average of all ratings for the movie, rounded to one decimal. `None`
    /// when the movie has no ratings.
    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>>;

    /// Combined aggregate-plus-own-rating read used when the caller identity
    /// is known.
    async fn get_rating_for_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>)>;

    /// Returns whether a rating row was actually removed.
    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// The user's full rating history, joined against movie slugs.
    async fn get_ratings_for_user(&self, user_id: Uuid) -> Result<Vec<MovieRating>>;
}
