use std::collections::HashSet;

use anyhow::Result;
use cinevault_core::CatalogError;
use cinevault_core::database::ports::MovieStore;
use cinevault_core::database::postgres::PostgresMovieStore;
use cinevault_core::domain::{GetAllMoviesOptions, Movie, SortDirection, SortField};
use sqlx::PgPool;
use uuid::Uuid;

fn fixture_id(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

fn movie(title: &str, year_of_release: i32, genres: &[&str]) -> Movie {
    Movie::new(
        title,
        year_of_release,
        genres.iter().map(|genre| genre.to_string()).collect(),
    )
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn create_then_get_returns_exact_genre_set(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let created = movie("The Matrix", 1999, &["Action", "Sci-Fi"]);

    store.create(&created).await?;

    let stored = store.get_by_id(created.id, None).await?.expect("movie inserted");
    assert_eq!(stored.title, "The Matrix");
    assert_eq!(stored.year_of_release, 1999);
    assert_eq!(
        stored.genres.iter().collect::<HashSet<_>>(),
        created.genres.iter().collect::<HashSet<_>>()
    );
    assert_eq!(stored.rating, None);
    assert_eq!(stored.user_rating, None);
    Ok(())
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn get_by_slug_finds_the_same_movie(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let created = movie("The Matrix", 1999, &["Action"]);

    store.create(&created).await?;

    let stored = store
        .get_by_slug("the-matrix-1999", None)
        .await?
        .expect("movie found by slug");
    assert_eq!(stored.id, created.id);

    assert!(store.get_by_slug("no-such-slug", None).await?.is_none());
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies"))
)]
async fn create_with_colliding_slug_is_a_conflict(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool.clone());
    // Same title and year as the seeded movie, so the derived slug collides.
    let duplicate = movie("Alien", 1979, &["Horror", "Sci-Fi"]);

    let result = store.create(&duplicate).await;
    assert!(matches!(result, Err(CatalogError::Conflict(_))));

    // The transaction rolled back: no genre rows for the rejected movie.
    let genre_rows: i64 = sqlx::query_scalar("SELECT count(*) FROM genres WHERE movie_id = $1")
        .bind(duplicate.id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(genre_rows, 0);
    Ok(())
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn update_replaces_entire_genre_set(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool.clone());
    let mut created = movie("The Matrix", 1999, &["Action", "Sci-Fi"]);
    store.create(&created).await?;

    created.genres = vec!["Cyberpunk".to_string()];
    assert!(store.update(&created).await?);

    let stored = store.get_by_id(created.id, None).await?.expect("movie kept");
    assert_eq!(stored.genres, vec!["Cyberpunk".to_string()]);

    // No residual rows from the old set.
    let genre_rows: i64 = sqlx::query_scalar("SELECT count(*) FROM genres WHERE movie_id = $1")
        .bind(created.id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(genre_rows, 1);
    Ok(())
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn update_of_missing_movie_returns_false(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let absent = movie("Ghost", 1990, &["Drama"]);
    assert!(!store.update(&absent).await?);
    Ok(())
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn second_delete_returns_false(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let created = movie("The Matrix", 1999, &["Action"]);
    store.create(&created).await?;

    assert!(store.delete_by_id(created.id).await?);
    assert!(!store.delete_by_id(created.id).await?);
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies", "ratings"))
)]
async fn delete_removes_rating_rows(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool.clone());
    let rated = fixture_id("22222222-2222-2222-2222-222222222222");

    assert!(store.delete_by_id(rated).await?);

    let rating_rows: i64 = sqlx::query_scalar("SELECT count(*) FROM ratings WHERE movie_id = $1")
        .bind(rated)
        .fetch_one(&pool)
        .await?;
    assert_eq!(rating_rows, 0);
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies"))
)]
async fn title_filter_matches_case_insensitively(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);

    let options = GetAllMoviesOptions::new().with_title("spider");
    let matched = store.get_all(&options).await?;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Spiderman 2");

    let options = GetAllMoviesOptions::new().with_title("SPIDER");
    assert_eq!(store.get_all(&options).await?.len(), 1);

    let options = GetAllMoviesOptions::new().with_title("zzz");
    assert!(store.get_all(&options).await?.is_empty());
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies"))
)]
async fn year_filter_matches_exactly(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);

    let options = GetAllMoviesOptions::new().with_year(1979);
    let matched = store.get_all(&options).await?;
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].title, "Alien");
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies"))
)]
async fn listing_applies_sort_directive(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);

    let options = GetAllMoviesOptions::new()
        .sorted_by(SortField::YearOfRelease, SortDirection::Descending);
    let years: Vec<i32> = store
        .get_all(&options)
        .await?
        .into_iter()
        .map(|m| m.year_of_release)
        .collect();
    assert_eq!(years, vec![2004, 1982, 1979]);

    let options =
        GetAllMoviesOptions::new().sorted_by(SortField::Title, SortDirection::Ascending);
    let titles: Vec<String> = store
        .get_all(&options)
        .await?
        .into_iter()
        .map(|m| m.title)
        .collect();
    assert_eq!(titles, vec!["Alien", "Blade Runner", "Spiderman 2"]);
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies"))
)]
async fn count_uses_the_same_predicates_as_listing(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);

    assert_eq!(store.get_count(None, None).await?, 3);
    assert_eq!(store.get_count(Some("alien"), None).await?, 1);
    assert_eq!(store.get_count(None, Some(1979)).await?, 1);
    assert_eq!(store.get_count(Some("alien"), Some(2004)).await?, 0);
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies", "ratings"))
)]
async fn point_read_joins_caller_rating(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let rated = fixture_id("22222222-2222-2222-2222-222222222222");
    let rater = fixture_id("aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa");
    let stranger = Uuid::new_v4();

    let seen_by_rater = store.get_by_id(rated, Some(rater)).await?.expect("movie");
    assert_eq!(seen_by_rater.rating, Some(4.5));
    assert_eq!(seen_by_rater.user_rating, Some(5));
    assert_eq!(seen_by_rater.genres, vec!["Horror".to_string()]);

    let seen_by_stranger = store.get_by_id(rated, Some(stranger)).await?.expect("movie");
    assert_eq!(seen_by_stranger.rating, Some(4.5));
    assert_eq!(seen_by_stranger.user_rating, None);

    let anonymous = store.get_by_id(rated, None).await?.expect("movie");
    assert_eq!(anonymous.user_rating, None);
    Ok(())
}

#[sqlx::test(
    migrator = "cinevault_core::MIGRATOR",
    fixtures(path = "./fixtures", scripts("movies", "ratings"))
)]
async fn listing_joins_aggregates_without_duplicating_genres(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);

    let listed = store.get_all(&GetAllMoviesOptions::new()).await?;
    assert_eq!(listed.len(), 3);

    let spiderman = listed
        .iter()
        .find(|m| m.title == "Spiderman 2")
        .expect("seeded movie");
    // Two genres and no rating fan-out duplication.
    assert_eq!(
        spiderman.genres.iter().collect::<HashSet<_>>(),
        ["Action".to_string(), "Adventure".to_string()]
            .iter()
            .collect::<HashSet<_>>()
    );

    let alien = listed.iter().find(|m| m.title == "Alien").expect("seeded movie");
    assert_eq!(alien.rating, Some(4.5));
    Ok(())
}

#[sqlx::test(migrator = "cinevault_core::MIGRATOR")]
async fn exists_probe_reflects_creation(pool: PgPool) -> Result<()> {
    let store = PostgresMovieStore::new(pool);
    let created = movie("The Matrix", 1999, &["Action"]);

    assert!(!store.exists_by_id(created.id).await?);
    store.create(&created).await?;
    assert!(store.exists_by_id(created.id).await?);
    Ok(())
}
