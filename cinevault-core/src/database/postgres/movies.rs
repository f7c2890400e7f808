use std::fmt;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::database::ports::MovieStore;
use crate::domain::{GetAllMoviesOptions, Movie};
use crate::error::{CatalogError, Result};

/// PostgreSQL-backed implementation of the [`MovieStore`] port.
///
/// Genre rows are normalized into their own table but read back flattened:
/// the rating join fans out rows per movie, so listings collapse genres with
/// `string_agg(DISTINCT ...)` and point reads fetch genres in a second query.
#[derive(Clone)]
pub struct PostgresMovieStore {
    pool: PgPool,
}

impl PostgresMovieStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn map_listing_row(row: &PgRow) -> Result<Movie> {
        let id: Uuid = row
            .try_get("id")
            .map_err(|e| CatalogError::Internal(format!("Failed to read movie id: {e}")))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| CatalogError::Internal(format!("Failed to read title: {e}")))?;
        let year_of_release: i32 = row
            .try_get("year_of_release")
            .map_err(|e| CatalogError::Internal(format!("Failed to read year of release: {e}")))?;
        let genres: Option<String> = row
            .try_get("genres")
            .map_err(|e| CatalogError::Internal(format!("Failed to read genres: {e}")))?;
        let rating: Option<f32> = row
            .try_get("rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read rating: {e}")))?;
        let user_rating: Option<i32> = row
            .try_get("user_rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read user rating: {e}")))?;

        let genres = genres
            .map(|joined| {
                joined
                    .split(',')
                    .map(|genre| genre.trim().to_string())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Movie {
            id,
            title,
            year_of_release,
            genres,
            rating,
            user_rating,
        })
    }

    /// Shared mapping for the two point reads, which skip the genre join and
    /// fetch genres separately to avoid per-genre row fan-out.
    async fn map_point_read(&self, row: Option<PgRow>) -> Result<Option<Movie>> {
        let Some(row) = row else {
            return Ok(None);
        };

        let id: Uuid = row
            .try_get("id")
            .map_err(|e| CatalogError::Internal(format!("Failed to read movie id: {e}")))?;
        let title: String = row
            .try_get("title")
            .map_err(|e| CatalogError::Internal(format!("Failed to read title: {e}")))?;
        let year_of_release: i32 = row
            .try_get("year_of_release")
            .map_err(|e| CatalogError::Internal(format!("Failed to read year of release: {e}")))?;
        let rating: Option<f32> = row
            .try_get("rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read rating: {e}")))?;
        let user_rating: Option<i32> = row
            .try_get("user_rating")
            .map_err(|e| CatalogError::Internal(format!("Failed to read user rating: {e}")))?;

        let genres: Vec<String> = sqlx::query_scalar("SELECT name FROM genres WHERE movie_id = $1")
            .bind(id)
            .fetch_all(self.pool())
            .await
            .map_err(|e| CatalogError::database("Failed to load genres", e))?;

        Ok(Some(Movie {
            id,
            title,
            year_of_release,
            genres,
            rating,
            user_rating,
        }))
    }
}

impl fmt::Debug for PostgresMovieStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresMovieStore")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .finish()
    }
}

#[async_trait]
impl MovieStore for PostgresMovieStore {
    async fn create(&self, movie: &Movie) -> Result<()> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CatalogError::database("Failed to start transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO movies (id, slug, title, year_of_release)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(movie.id)
        .bind(movie.slug())
        .bind(&movie.title)
        .bind(movie.year_of_release)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.constraint() == Some("idx_movies_slug")
            {
                return CatalogError::Conflict(format!(
                    "slug '{}' is already in use",
                    movie.slug()
                ));
            }
            CatalogError::database("Failed to insert movie", e)
        })?;

        for genre in &movie.genres {
            sqlx::query("INSERT INTO genres (movie_id, name) VALUES ($1, $2)")
                .bind(movie.id)
                .bind(genre)
                .execute(&mut *tx)
                .await
                .map_err(|e| CatalogError::database("Failed to insert genre", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| CatalogError::database("Failed to commit transaction", e))?;

        info!("Created movie: {} ({})", movie.title, movie.id);
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT m.id, m.title, m.year_of_release,
                   round(avg(r.rating)::numeric, 1)::real AS rating,
                   myr.rating AS user_rating
            FROM movies m
            LEFT JOIN ratings r ON m.id = r.movie_id
            LEFT JOIN ratings myr ON m.id = myr.movie_id AND myr.user_id = $2
            WHERE m.id = $1
            GROUP BY m.id, myr.rating
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to get movie by id", e))?;

        self.map_point_read(row).await
    }

    async fn get_by_slug(&self, slug: &str, user_id: Option<Uuid>) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT m.id, m.title, m.year_of_release,
                   round(avg(r.rating)::numeric, 1)::real AS rating,
                   myr.rating AS user_rating
            FROM movies m
            LEFT JOIN ratings r ON m.id = r.movie_id
            LEFT JOIN ratings myr ON m.id = myr.movie_id AND myr.user_id = $2
            WHERE m.slug = $1
            GROUP BY m.id, myr.rating
            "#,
        )
        .bind(slug)
        .bind(user_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to get movie by slug", e))?;

        self.map_point_read(row).await
    }

    async fn get_all(&self, options: &GetAllMoviesOptions) -> Result<Vec<Movie>> {
        let order_by = match options.sort {
            Some(sort) => format!(
                "ORDER BY {} {}",
                sort.field.column(),
                sort.direction.as_sql()
            ),
            None => String::new(),
        };

        let sql = format!(
            r#"
            SELECT m.id, m.slug, m.title, m.year_of_release,
                   string_agg(DISTINCT g.name, ',') AS genres,
                   round(avg(r.rating)::numeric, 1)::real AS rating,
                   myr.rating AS user_rating
            FROM movies m
            LEFT JOIN genres g ON m.id = g.movie_id
            LEFT JOIN ratings r ON m.id = r.movie_id
            LEFT JOIN ratings myr ON m.id = myr.movie_id AND myr.user_id = $1
            WHERE ($2::text IS NULL OR lower(m.title) LIKE '%' || $2 || '%')
              AND ($3::int4 IS NULL OR m.year_of_release = $3)
            GROUP BY m.id, myr.rating
            {order_by}
            "#
        );

        let rows = sqlx::query(&sql)
            .bind(options.user_id)
            .bind(options.title.as_deref().map(str::to_lowercase))
            .bind(options.year_of_release)
            .fetch_all(self.pool())
            .await
            .map_err(|e| CatalogError::database("Failed to list movies", e))?;

        rows.iter().map(Self::map_listing_row).collect()
    }

    async fn get_count(&self, title: Option<&str>, year_of_release: Option<i32>) -> Result<i64> {
        sqlx::query_scalar(
            r#"
            SELECT count(*)
            FROM movies m
            WHERE ($1::text IS NULL OR lower(m.title) LIKE '%' || $1 || '%')
              AND ($2::int4 IS NULL OR m.year_of_release = $2)
            "#,
        )
        .bind(title.map(str::to_lowercase))
        .bind(year_of_release)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CatalogError::database("Failed to count movies", e))
    }

    async fn update(&self, movie: &Movie) -> Result<bool> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CatalogError::database("Failed to start transaction", e))?;

        // Movie row first: a zero-row update means the movie is gone, and
        // genre inserts against a missing movie would trip the foreign key.
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET slug = $2, title = $3, year_of_release = $4
            WHERE id = $1
            "#,
        )
        .bind(movie.id)
        .bind(movie.slug())
        .bind(&movie.title)
        .bind(movie.year_of_release)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error()
                && db_err.constraint() == Some("idx_movies_slug")
            {
                return CatalogError::Conflict(format!(
                    "slug '{}' is already in use",
                    movie.slug()
                ));
            }
            CatalogError::database("Failed to update movie", e)
        })?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("DELETE FROM genres WHERE movie_id = $1")
            .bind(movie.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::database("Failed to clear genres", e))?;

        for genre in &movie.genres {
            sqlx::query("INSERT INTO genres (movie_id, name) VALUES ($1, $2)")
                .bind(movie.id)
                .bind(genre)
                .execute(&mut *tx)
                .await
                .map_err(|e| CatalogError::database("Failed to insert genre", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| CatalogError::database("Failed to commit transaction", e))?;

        Ok(true)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CatalogError::database("Failed to start transaction", e))?;

        // Ratings cascade with the movie so no orphaned rows survive.
        sqlx::query("DELETE FROM ratings WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::database("Failed to delete ratings", e))?;

        sqlx::query("DELETE FROM genres WHERE movie_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::database("Failed to delete genres", e))?;

        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| CatalogError::database("Failed to delete movie", e))?;

        tx.commit()
            .await
            .map_err(|e| CatalogError::database("Failed to commit transaction", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM movies WHERE id = $1)")
            .bind(id)
            .fetch_one(self.pool())
            .await
            .map_err(|e| CatalogError::database("Failed to check movie existence", e))
    }
}
