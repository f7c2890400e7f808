use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::database::ports::{MovieStore, RatingStore};
use crate::domain::MovieRating;
use crate::error::{CatalogError, Result};
use crate::validation::{RuleViolation, ValidationFailure};

/// Rating operations, gated on the movie actually existing.
pub struct RatingService {
    ratings: Arc<dyn RatingStore>,
    movies: Arc<dyn MovieStore>,
}

impl fmt::Debug for RatingService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RatingService").finish_non_exhaustive()
    }
}

impl RatingService {
    pub fn new(ratings: Arc<dyn RatingStore>, movies: Arc<dyn MovieStore>) -> Self {
        Self { ratings, movies }
    }

    /// Upsert the user's rating for a movie. Values outside 1-5 are rejected.
    pub async fn rate_movie(&self, movie_id: Uuid, user_id: Uuid, rating: i32) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(CatalogError::Validation(ValidationFailure {
                violations: vec![RuleViolation {
                    property: "rating",
                    message: "rating must be between 1 and 5".to_string(),
                }],
            }));
        }

        if !self.movies.exists_by_id(movie_id).await? {
            return Err(CatalogError::NotFound(format!(
                "movie {movie_id} does not exist"
            )));
        }

        self.ratings.rate_movie(movie_id, user_id, rating).await
    }

    pub async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>> {
        self.ratings.get_rating(movie_id).await
    }

    pub async fn get_rating_for_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>)> {
        self.ratings.get_rating_for_user(movie_id, user_id).await
    }

    pub async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.ratings.delete_rating(movie_id, user_id).await
    }

    pub async fn get_ratings_for_user(&self, user_id: Uuid) -> Result<Vec<MovieRating>> {
        self.ratings.get_ratings_for_user(user_id).await
    }
}
