//! List-backed in-memory adapter for the store ports, a drop-in alternative
//! for tests and local composition. Both stores share one [`InMemoryCatalog`]
//! so movie reads can aggregate rating rows the same way the Postgres adapter
//! joins tables.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::ports::{MovieStore, RatingStore};
use crate::domain::{GetAllMoviesOptions, Movie, MovieRating, SortDirection, SortField};
use crate::error::{CatalogError, Result};

#[derive(Debug, Clone)]
struct MovieRow {
    id: Uuid,
    slug: String,
    title: String,
    year_of_release: i32,
    genres: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
struct RatingRow {
    movie_id: Uuid,
    user_id: Uuid,
    rating: i32,
}

#[derive(Debug, Default)]
struct CatalogState {
    // Lock order is movies before ratings wherever both are held.
    movies: RwLock<Vec<MovieRow>>,
    ratings: RwLock<Vec<RatingRow>>,
}

/// Shared backing state for the in-memory stores.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    state: Arc<CatalogState>,
}

impl InMemoryCatalog {
    pub fn movie_store(&self) -> InMemoryMovieStore {
        InMemoryMovieStore {
            state: Arc::clone(&self.state),
        }
    }

    pub fn rating_store(&self) -> InMemoryRatingStore {
        InMemoryRatingStore {
            state: Arc::clone(&self.state),
        }
    }
}

fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn aggregate_rating(ratings: &[RatingRow], movie_id: Uuid) -> Option<f32> {
    let values: Vec<i32> = ratings
        .iter()
        .filter(|row| row.movie_id == movie_id)
        .map(|row| row.rating)
        .collect();
    if values.is_empty() {
        return None;
    }
    let sum: i32 = values.iter().sum();
    Some(round_one_decimal(sum as f32 / values.len() as f32))
}

fn rating_of_user(ratings: &[RatingRow], movie_id: Uuid, user_id: Uuid) -> Option<i32> {
    ratings
        .iter()
        .find(|row| row.movie_id == movie_id && row.user_id == user_id)
        .map(|row| row.rating)
}

fn to_movie(row: &MovieRow, ratings: &[RatingRow], user_id: Option<Uuid>) -> Movie {
    Movie {
        id: row.id,
        title: row.title.clone(),
        year_of_release: row.year_of_release,
        genres: row.genres.clone(),
        rating: aggregate_rating(ratings, row.id),
        user_rating: user_id.and_then(|user_id| rating_of_user(ratings, row.id, user_id)),
    }
}

fn matches(row: &MovieRow, title: Option<&str>, year_of_release: Option<i32>) -> bool {
    if let Some(title) = title
        && !row.title.to_lowercase().contains(&title.to_lowercase())
    {
        return false;
    }
    if let Some(year) = year_of_release
        && row.year_of_release != year
    {
        return false;
    }
    true
}

/// In-memory implementation of the [`MovieStore`] port.
#[derive(Debug, Clone)]
pub struct InMemoryMovieStore {
    state: Arc<CatalogState>,
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn create(&self, movie: &Movie) -> Result<()> {
        let mut movies = self.state.movies.write().await;

        let slug = movie.slug();
        if movies.iter().any(|row| row.slug == slug) {
            return Err(CatalogError::Conflict(format!(
                "slug '{slug}' is already in use"
            )));
        }

        movies.push(MovieRow {
            id: movie.id,
            slug,
            title: movie.title.clone(),
            year_of_release: movie.year_of_release,
            genres: movie.genres.clone(),
        });
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        let movies = self.state.movies.read().await;
        let ratings = self.state.ratings.read().await;
        Ok(movies
            .iter()
            .find(|row| row.id == id)
            .map(|row| to_movie(row, &ratings, user_id)))
    }

    async fn get_by_slug(&self, slug: &str, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        let movies = self.state.movies.read().await;
        let ratings = self.state.ratings.read().await;
        Ok(movies
            .iter()
            .find(|row| row.slug == slug)
            .map(|row| to_movie(row, &ratings, user_id)))
    }

    async fn get_all(&self, options: &GetAllMoviesOptions) -> Result<Vec<Movie>> {
        let movies = self.state.movies.read().await;
        let ratings = self.state.ratings.read().await;

        let mut matched: Vec<&MovieRow> = movies
            .iter()
            .filter(|row| matches(row, options.title.as_deref(), options.year_of_release))
            .collect();

        if let Some(sort) = options.sort {
            matched.sort_by(|a, b| {
                let ordering = match sort.field {
                    SortField::Title => a.title.cmp(&b.title),
                    SortField::YearOfRelease => a.year_of_release.cmp(&b.year_of_release),
                };
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        Ok(matched
            .into_iter()
            .map(|row| to_movie(row, &ratings, options.user_id))
            .collect())
    }

    async fn get_count(&self, title: Option<&str>, year_of_release: Option<i32>) -> Result<i64> {
        let movies = self.state.movies.read().await;
        Ok(movies
            .iter()
            .filter(|row| matches(row, title, year_of_release))
            .count() as i64)
    }

    async fn update(&self, movie: &Movie) -> Result<bool> {
        let mut movies = self.state.movies.write().await;

        let slug = movie.slug();
        if movies
            .iter()
            .any(|row| row.slug == slug && row.id != movie.id)
        {
            return Err(CatalogError::Conflict(format!(
                "slug '{slug}' is already in use"
            )));
        }

        let Some(row) = movies.iter_mut().find(|row| row.id == movie.id) else {
            return Ok(false);
        };

        row.slug = slug;
        row.title = movie.title.clone();
        row.year_of_release = movie.year_of_release;
        row.genres = movie.genres.clone();
        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut movies = self.state.movies.write().await;
        let mut ratings = self.state.ratings.write().await;

        let before = movies.len();
        movies.retain(|row| row.id != id);
        let removed = movies.len() < before;

        if removed {
            ratings.retain(|row| row.movie_id != id);
        }
        Ok(removed)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool> {
        let movies = self.state.movies.read().await;
        Ok(movies.iter().any(|row| row.id == id))
    }
}

/// In-memory implementation of the [`RatingStore`] port.
#[derive(Debug, Clone)]
pub struct InMemoryRatingStore {
    state: Arc<CatalogState>,
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn rate_movie(&self, movie_id: Uuid, user_id: Uuid, rating: i32) -> Result<()> {
        let movies = self.state.movies.read().await;
        if !movies.iter().any(|row| row.id == movie_id) {
            return Err(CatalogError::NotFound(format!(
                "movie {movie_id} does not exist"
            )));
        }
        drop(movies);

        let mut ratings = self.state.ratings.write().await;
        match ratings
            .iter_mut()
            .find(|row| row.movie_id == movie_id && row.user_id == user_id)
        {
            Some(row) => row.rating = rating,
            None => ratings.push(RatingRow {
                movie_id,
                user_id,
                rating,
            }),
        }
        Ok(())
    }

    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>> {
        let ratings = self.state.ratings.read().await;
        Ok(aggregate_rating(&ratings, movie_id))
    }

    async fn get_rating_for_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>)> {
        let ratings = self.state.ratings.read().await;
        Ok((
            aggregate_rating(&ratings, movie_id),
            rating_of_user(&ratings, movie_id, user_id),
        ))
    }

    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut ratings = self.state.ratings.write().await;
        let before = ratings.len();
        ratings.retain(|row| !(row.movie_id == movie_id && row.user_id == user_id));
        Ok(ratings.len() < before)
    }

    async fn get_ratings_for_user(&self, user_id: Uuid) -> Result<Vec<MovieRating>> {
        let movies = self.state.movies.read().await;
        let ratings = self.state.ratings.read().await;

        Ok(ratings
            .iter()
            .filter(|row| row.user_id == user_id)
            .filter_map(|row| {
                movies
                    .iter()
                    .find(|movie| movie.id == row.movie_id)
                    .map(|movie| MovieRating {
                        movie_id: row.movie_id,
                        slug: movie.slug.clone(),
                        rating: row.rating,
                    })
            })
            .collect())
    }
}
