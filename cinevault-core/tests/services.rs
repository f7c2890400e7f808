//! Service-layer behavior over the in-memory stores: validation gating,
//! cache-tag eviction, and rating bounds.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use cinevault_core::CatalogError;
use cinevault_core::cache::{CacheInvalidator, MOVIES_TAG};
use cinevault_core::database::memory::InMemoryCatalog;
use cinevault_core::domain::Movie;
use cinevault_core::services::{MovieService, RatingService};

/// Records every evicted tag so tests can assert when eviction happened.
#[derive(Debug, Default)]
struct RecordingCacheInvalidator {
    evictions: Mutex<Vec<String>>,
}

impl RecordingCacheInvalidator {
    fn evicted(&self) -> Vec<String> {
        self.evictions.lock().unwrap().clone()
    }
}

#[async_trait]
impl CacheInvalidator for RecordingCacheInvalidator {
    async fn evict_tag(&self, tag: &str) -> cinevault_core::Result<()> {
        self.evictions.lock().unwrap().push(tag.to_string());
        Ok(())
    }
}

fn movie_service(
    catalog: &InMemoryCatalog,
    cache: Arc<RecordingCacheInvalidator>,
) -> MovieService {
    MovieService::new(
        Arc::new(catalog.movie_store()),
        Arc::new(catalog.rating_store()),
        cache,
    )
}

fn rating_service(catalog: &InMemoryCatalog) -> RatingService {
    RatingService::new(
        Arc::new(catalog.rating_store()),
        Arc::new(catalog.movie_store()),
    )
}

fn sample_movie() -> Movie {
    Movie::new("Alien", 1979, vec!["Horror".to_string(), "Sci-Fi".to_string()])
}

#[tokio::test]
async fn create_stores_movie_and_evicts_tag() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));

    let movie = sample_movie();
    service.create(&movie).await?;

    let stored = service.get_by_id(movie.id, None).await?;
    assert_eq!(stored.as_ref().map(|m| m.title.as_str()), Some("Alien"));
    assert_eq!(cache.evicted(), vec![MOVIES_TAG.to_string()]);
    Ok(())
}

#[tokio::test]
async fn create_rejects_duplicate_slug_without_evicting() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));

    service.create(&sample_movie()).await?;

    let duplicate = sample_movie();
    let err = service.create(&duplicate).await.unwrap_err();
    let CatalogError::Validation(failure) = err else {
        panic!("expected validation error, got {err:?}");
    };
    assert_eq!(failure.violations.len(), 1);
    assert_eq!(failure.violations[0].property, "slug");

    assert_eq!(service.get_count(None, None).await?, 1);
    assert_eq!(cache.evicted().len(), 1);
    Ok(())
}

#[tokio::test]
async fn create_accumulates_every_violation() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));

    let movie = Movie::new("   ", 2999, vec![]);
    let err = service.create(&movie).await.unwrap_err();
    let CatalogError::Validation(failure) = err else {
        panic!("expected validation error, got {err:?}");
    };

    let properties: Vec<&str> = failure.violations.iter().map(|v| v.property).collect();
    assert_eq!(properties, vec!["title", "genres", "year_of_release"]);
    assert!(cache.evicted().is_empty());
    Ok(())
}

#[tokio::test]
async fn update_of_missing_movie_returns_none_without_evicting() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));

    let updated = service.update(sample_movie(), None).await?;
    assert!(updated.is_none());
    assert!(cache.evicted().is_empty());
    Ok(())
}

#[tokio::test]
async fn update_keeps_its_own_slug_and_decorates_ratings() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));
    let ratings = rating_service(&catalog);

    let mut movie = sample_movie();
    service.create(&movie).await?;

    let rater = Uuid::new_v4();
    ratings.rate_movie(movie.id, rater, 4).await?;
    ratings.rate_movie(movie.id, Uuid::new_v4(), 5).await?;

    // Same title and year, so the slug re-validates against itself.
    movie.genres.push("Thriller".to_string());
    let updated = service
        .update(movie.clone(), Some(rater))
        .await?
        .expect("movie exists");

    assert_eq!(updated.genres.len(), 3);
    assert_eq!(updated.rating, Some(4.5));
    assert_eq!(updated.user_rating, Some(4));
    assert_eq!(cache.evicted().len(), 2);
    Ok(())
}

#[tokio::test]
async fn update_without_caller_carries_aggregate_only() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));
    let ratings = rating_service(&catalog);

    let movie = sample_movie();
    service.create(&movie).await?;
    ratings.rate_movie(movie.id, Uuid::new_v4(), 3).await?;

    let updated = service.update(movie, None).await?.expect("movie exists");
    assert_eq!(updated.rating, Some(3.0));
    assert_eq!(updated.user_rating, None);
    Ok(())
}

#[tokio::test]
async fn delete_evicts_only_when_a_row_was_removed() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let service = movie_service(&catalog, Arc::clone(&cache));

    let movie = sample_movie();
    service.create(&movie).await?;
    assert_eq!(cache.evicted().len(), 1);

    assert!(service.delete_by_id(movie.id).await?);
    assert_eq!(cache.evicted().len(), 2);

    assert!(!service.delete_by_id(movie.id).await?);
    assert_eq!(cache.evicted().len(), 2);
    Ok(())
}

#[tokio::test]
async fn rate_movie_rejects_out_of_range_values() -> anyhow::Result<()> {
    let catalog = InMemoryCatalog::default();
    let cache = Arc::new(RecordingCacheInvalidator::default());
    let movies = movie_service(&catalog, cache);
    let ratings = rating_service(&catalog);

    let movie = sample_movie();
    movies.create(&movie).await?;

    for rating in [0, 6, -1] {
        let err = ratings
            .rate_movie(movie.id, Uuid::new_v4(), rating)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)), "{rating}: {err:?}");
    }

    assert_eq!(ratings.get_rating(movie.id).await?, None);
    Ok(())
}

#[tokio::test]
async fn rate_unknown_movie_is_not_found() {
    let catalog = InMemoryCatalog::default();
    let ratings = rating_service(&catalog);

    let err = ratings
        .rate_movie(Uuid::new_v4(), Uuid::new_v4(), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}
