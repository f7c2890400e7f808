use std::fmt;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::database::ports::RatingStore;
use crate::domain::MovieRating;
use crate::error::{CatalogError, Result};

/// PostgreSQL-backed implementation of the [`RatingStore`] port.
#[derive(Clone)]
pub struct PostgresRatingStore {
    pool: PgPool,
}

impl PostgresRatingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl fmt::Debug for PostgresRatingStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresRatingStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

#[async_trait]
impl RatingStore for PostgresRatingStore {
    async fn rate_movie(&self, movie_id: Uuid, user_id: Uuid, rating: i32) -> Result<()> {
        // A single insert-or-update statement; never read-then-write, so two
        // concurrent raters on the same (movie, user) cannot race.
        sqlx::query(
            r#"
            INSERT INTO ratings (movie_id, user_id, rating)
            VALUES ($1, $2, $3)
            ON CONFLICT (movie_id, user_id) DO UPDATE
            SET rating = EXCLUDED.rating
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .bind(rating)
        .execute(self.pool())
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.is_foreign_key_violation()
            {
                return CatalogError::NotFound(format!("movie {movie_id} does not exist"));
            }
            CatalogError::database("Failed to rate movie", e)
        })?;

        debug!("Stored rating {} for movie {} by user {}", rating, movie_id, user_id);
        Ok(())
    }

    async fn get_rating(&self, movie_id: Uuid) -> Result<Option<f32>> {
        sqlx::query_scalar(
            r#"
            SELECT round(avg(rating)::numeric, 1)::real
            FROM ratings
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to load aggregate rating", e))
    }

    async fn get_rating_for_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> Result<(Option<f32>, Option<i32>)> {
        let row = sqlx::query(
            r#"
            SELECT round(avg(rating)::numeric, 1)::real AS rating,
                   (SELECT rating
                    FROM ratings
                    WHERE movie_id = $1 AND user_id = $2) AS user_rating
            FROM ratings
            WHERE movie_id = $1
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to load user rating", e))?;

        let rating: Option<f32> = row
            .try_get("rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read rating: {e}")))?;
        let user_rating: Option<i32> = row
            .try_get("user_rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read user rating: {e}")))?;

        Ok((rating, user_rating))
    }

    async fn delete_rating(&self, movie_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM ratings
            WHERE movie_id = $1 AND user_id = $2
            "#,
        )
        .bind(movie_id)
        .bind(user_id)
        .execute(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to delete rating", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_ratings_for_user(&self, user_id: Uuid) -> Result<Vec<MovieRating>> {
        let rows = sqlx::query(
            r#"
            SELECT r.movie_id, m.slug, r.rating
            FROM ratings r
            INNER JOIN movies m ON r.movie_id = m.id
            WHERE r.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to load rating history", e))?;

        rows.iter()
            .map(|row| {
                let movie_id: Uuid = row
                    .try_get("movie_id")
                    .map_err(|e| CatalogError::Internal(format!("Failed to read movie id: {e}")))?;
                let slug: String = row
                    .try_get("slug")
                    .map_err(|e| CatalogError::Internal(format!("Failed to read slug: {e}")))?;
                let rating: i32 = row
                    .try_get("rating")
                    .map_err(|e| CatalogError::Internal(format!("Failed to read rating: {e}")))?;

                Ok(MovieRating {
                    movie_id,
                    slug,
                    rating,
                })
            })
            .collect()
    }
}
