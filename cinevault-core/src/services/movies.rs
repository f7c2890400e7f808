use std::fmt;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::cache::{CacheInvalidator, MOVIES_TAG};
use crate::database::ports::{MovieStore, RatingStore};
use crate::domain::{GetAllMoviesOptions, Movie};
use crate::error::Result;
use crate::validation::MovieValidator;

/// Catalog operations over movies: validation, storage, and cache eviction.
pub struct MovieService {
    movies: Arc<dyn MovieStore>,
    ratings: Arc<dyn RatingStore>,
    validator: MovieValidator,
    cache: Arc<dyn CacheInvalidator>,
}

impl fmt::Debug for MovieService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MovieService").finish_non_exhaustive()
    }
}

impl MovieService {
    pub fn new(
        movies: Arc<dyn MovieStore>,
        ratings: Arc<dyn RatingStore>,
        cache: Arc<dyn CacheInvalidator>,
    ) -> Self {
        let validator = MovieValidator::new(Arc::clone(&movies));
        Self {
            movies,
            ratings,
            validator,
            cache,
        }
    }

    /// Validate and store a new movie, then evict cached movie reads.
    pub async fn create(&self, movie: &Movie) -> Result<()> {
        self.validator.validate(movie).await?;
        self.movies.create(movie).await?;
        self.cache.evict_tag(MOVIES_TAG).await?;

        info!("Created movie '{}' ({})", movie.title, movie.id);
        Ok(())
    }

    pub async fn get_by_id(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        self.movies.get_by_id(id, user_id).await
    }

    pub async fn get_by_slug(&self, slug: &str, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        self.movies.get_by_slug(slug, user_id).await
    }

    pub async fn get_all(&self, options: &GetAllMoviesOptions) -> Result<Vec<Movie>> {
        self.movies.get_all(options).await
    }

    pub async fn get_count(
        &self,
        title: Option<&str>,
        year_of_release: Option<i32>,
    ) -> Result<i64> {
        self.movies.get_count(title, year_of_release).await
    }

    /// Validate and overwrite an existing movie.
    ///
    /// Returns `Ok(None)` when no movie with that id exists. On success the
    /// returned movie carries a fresh aggregate rating (and the caller's own
    /// rating when `user_id` is supplied).
    pub async fn update(&self, mut movie: Movie, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        self.validator.validate(&movie).await?;

        if !self.movies.exists_by_id(movie.id).await? {
            return Ok(None);
        }

        self.movies.update(&movie).await?;
        self.cache.evict_tag(MOVIES_TAG).await?;

        match user_id {
            Some(user_id) => {
                let (rating, user_rating) =
                    self.ratings.get_rating_for_user(movie.id, user_id).await?;
                movie.rating = rating;
                movie.user_rating = user_rating;
            }
            None => {
                movie.rating = self.ratings.get_rating(movie.id).await?;
            }
        }

        info!("Updated movie '{}' ({})", movie.title, movie.id);
        Ok(Some(movie))
    }

    /// Delete a movie and everything hanging off it. Evicts the cache tag
    /// only when a row was actually removed.
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let removed = self.movies.delete_by_id(id).await?;
        if removed {
            self.cache.evict_tag(MOVIES_TAG).await?;
            info!("Deleted movie {}", id);
        }
        Ok(removed)
    }

    pub async fn exists_by_id(&self, id: Uuid) -> Result<bool> {
        self.movies.exists_by_id(id).await
    }
}
