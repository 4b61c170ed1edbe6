//! Gallery Selection Cache.
//!
//! Keeps a time-bounded snapshot of every media record and hands out random
//! selections for page decoration. `sample_unique_images` never repeats an
//! image until the whole image pool has been served once; the other sampling
//! operations are independent draws.
//!
//! The cache is an explicit object owned by the application state. Its state
//! lives behind one async mutex, so a refresh and the sampling that follows it
//! happen atomically with respect to other requests.

use std::collections::HashSet;
use std::future::Future;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{MediaItem, MediaType};

/// Where the cache loads its snapshot from.
pub trait MediaSource: Send + Sync {
    fn fetch_all_media(&self) -> impl Future<Output = Result<Vec<MediaItem>, AppError>> + Send;
}

/// Outcome of checking the snapshot against the TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Hit,
    CacheMiss,
}

struct CacheState {
    items: Vec<MediaItem>,
    /// `None` means never fetched, or invalidated.
    fetched_at: Option<Instant>,
    excluded: HashSet<i64>,
    rng: Box<dyn RngCore + Send>,
}

impl CacheState {
    fn lookup(&self, ttl: Duration) -> Lookup {
        match self.fetched_at {
            Some(at) if !self.items.is_empty() && at.elapsed() < ttl => Lookup::Hit,
            _ => Lookup::CacheMiss,
        }
    }

    fn pool(&self, keep: impl Fn(&MediaItem) -> bool) -> Vec<MediaItem> {
        self.items.iter().filter(|item| keep(item)).cloned().collect()
    }
}

pub struct GalleryCache<S> {
    source: S,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl<S: MediaSource> GalleryCache<S> {
    pub fn new(source: S, ttl: Duration) -> Self {
        Self::with_rng(source, ttl, Box::new(StdRng::from_entropy()))
    }

    /// Build a cache with a caller-provided random source.
    pub fn with_rng(source: S, ttl: Duration, rng: Box<dyn RngCore + Send>) -> Self {
        Self {
            source,
            ttl,
            state: Mutex::new(CacheState {
                items: Vec::new(),
                fetched_at: None,
                excluded: HashSet::new(),
                rng,
            }),
        }
    }

    /// Return the snapshot, refetching it when it is empty or older than the TTL.
    ///
    /// The exclusion set is left alone.
    pub async fn refresh(&self) -> Result<Vec<MediaItem>, AppError> {
        let mut state = self.state.lock().await;
        self.ensure_fresh(&mut state).await?;
        Ok(state.items.clone())
    }

    async fn ensure_fresh(&self, state: &mut CacheState) -> Result<(), AppError> {
        match state.lookup(self.ttl) {
            Lookup::Hit => {
                tracing::debug!(items = state.items.len(), "Gallery cache hit");
            }
            Lookup::CacheMiss => {
                let items = self.source.fetch_all_media().await?;
                tracing::debug!(items = items.len(), "Gallery cache miss, snapshot reloaded");
                state.items = items;
                state.fetched_at = Some(Instant::now());
            }
        }
        Ok(())
    }

    /// Up to `count` images not served since the current cycle began.
    ///
    /// When fewer than `count` remain, the remaining ones are served, a new
    /// cycle starts, and the rest is filled from the full pool without
    /// repeating anything in this response.
    pub async fn sample_unique_images(&self, count: usize) -> Result<Vec<MediaItem>, AppError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut guard = self.state.lock().await;
        self.ensure_fresh(&mut guard).await?;
        let state = &mut *guard;

        let images = state.pool(|item| item.media_type == MediaType::Image);
        let mut available: Vec<MediaItem> = images
            .iter()
            .filter(|item| !state.excluded.contains(&item.id))
            .cloned()
            .collect();
        available.shuffle(state.rng.as_mut());

        if available.len() >= count {
            available.truncate(count);
            state.excluded.extend(available.iter().map(|item| item.id));
            return Ok(available);
        }

        let carried: HashSet<i64> = available.iter().map(|item| item.id).collect();
        let mut fill: Vec<MediaItem> = images
            .into_iter()
            .filter(|item| !carried.contains(&item.id))
            .collect();
        fill.shuffle(state.rng.as_mut());
        fill.truncate(count - available.len());

        tracing::debug!(
            carried = carried.len(),
            filled = fill.len(),
            "Unique image pool exhausted, starting a new cycle"
        );

        state.excluded = fill.iter().map(|item| item.id).collect();

        let mut selection = available;
        selection.extend(fill);
        selection.shuffle(state.rng.as_mut());
        Ok(selection)
    }

    /// Random images, repeats allowed across calls.
    pub async fn sample_images(&self, count: usize) -> Result<Vec<MediaItem>, AppError> {
        self.sample_where(count, |item| item.media_type == MediaType::Image)
            .await
    }

    /// Random videos, repeats allowed across calls.
    pub async fn sample_videos(&self, count: usize) -> Result<Vec<MediaItem>, AppError> {
        self.sample_where(count, |item| item.media_type == MediaType::Video)
            .await
    }

    /// Random media of either type.
    pub async fn sample_any(&self, count: usize) -> Result<Vec<MediaItem>, AppError> {
        self.sample_where(count, |_| true).await
    }

    async fn sample_where(
        &self,
        count: usize,
        keep: impl Fn(&MediaItem) -> bool,
    ) -> Result<Vec<MediaItem>, AppError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut guard = self.state.lock().await;
        self.ensure_fresh(&mut guard).await?;
        let state = &mut *guard;

        let mut pool = state.pool(keep);
        pool.shuffle(state.rng.as_mut());
        pool.truncate(count);
        Ok(pool)
    }

    /// Start a new non-repeating cycle without dropping the snapshot.
    pub async fn reset_exclusions(&self) {
        self.state.lock().await.excluded.clear();
    }

    /// Drop the snapshot and the exclusion set. Call after any media change.
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        state.items.clear();
        state.fetched_at = None;
        state.excluded.clear();
        tracing::debug!("Gallery cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingSource {
        items: Vec<MediaItem>,
        calls: Arc<AtomicUsize>,
    }

    impl CountingSource {
        fn new(items: Vec<MediaItem>) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    items,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    impl MediaSource for CountingSource {
        async fn fetch_all_media(&self) -> Result<Vec<MediaItem>, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    struct FailingSource;

    impl MediaSource for FailingSource {
        async fn fetch_all_media(&self) -> Result<Vec<MediaItem>, AppError> {
            Err(AppError::Storage("database is locked".to_string()))
        }
    }

    fn item(id: i64, media_type: MediaType) -> MediaItem {
        MediaItem {
            id,
            title: format!("Media {}", id),
            url: format!("https://cdn.example.com/{}.jpg", id),
            alt: None,
            media_type,
            source: None,
            thumbnail: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn images(ids: impl IntoIterator<Item = i64>) -> Vec<MediaItem> {
        ids.into_iter().map(|id| item(id, MediaType::Image)).collect()
    }

    fn cache(items: Vec<MediaItem>, ttl: Duration) -> (GalleryCache<CountingSource>, Arc<AtomicUsize>) {
        let (source, calls) = CountingSource::new(items);
        let cache = GalleryCache::with_rng(source, ttl, Box::new(StdRng::seed_from_u64(7)));
        (cache, calls)
    }

    fn ids(items: &[MediaItem]) -> Vec<i64> {
        items.iter().map(|item| item.id).collect()
    }

    #[tokio::test]
    async fn test_refresh_respects_ttl() {
        let (cache, calls) = cache(images(1..=3), Duration::from_secs(300));

        cache.refresh().await.unwrap();
        cache.refresh().await.unwrap();
        cache.sample_images(2).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_ttl_always_refetches() {
        let (cache, calls) = cache(images(1..=3), Duration::ZERO);

        cache.refresh().await.unwrap();
        cache.refresh().await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_snapshot_is_refetched() {
        let (cache, calls) = cache(Vec::new(), Duration::from_secs(300));

        assert!(cache.refresh().await.unwrap().is_empty());
        assert!(cache.sample_any(3).await.unwrap().is_empty());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unique_images_do_not_repeat_within_cycle() {
        let (cache, _) = cache(images(1..=10), Duration::from_secs(300));

        let mut seen = HashSet::new();
        for _ in 0..10 {
            let picked = cache.sample_unique_images(1).await.unwrap();
            assert_eq!(picked.len(), 1);
            assert!(seen.insert(picked[0].id), "repeated id {}", picked[0].id);
        }

        // Cycle exhausted, the next call still serves one image
        assert_eq!(cache.sample_unique_images(1).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unique_images_cover_small_pool_before_repeating() {
        let (cache, _) = cache(images(1..=3), Duration::from_secs(300));

        let first = ids(&cache.sample_unique_images(2).await.unwrap());
        let second = ids(&cache.sample_unique_images(2).await.unwrap());
        let third = ids(&cache.sample_unique_images(2).await.unwrap());

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_eq!(third.len(), 2);

        let first_two: HashSet<i64> = first.iter().chain(second.iter()).copied().collect();
        assert_eq!(first_two, HashSet::from([1, 2, 3]));

        // Responses never contain duplicates
        for picked in [&first, &second, &third] {
            assert_ne!(picked[0], picked[1]);
        }
    }

    #[tokio::test]
    async fn test_unique_request_larger_than_pool_returns_whole_pool() {
        let (cache, _) = cache(images(1..=4), Duration::from_secs(300));

        let mut picked = ids(&cache.sample_unique_images(10).await.unwrap());
        picked.sort();
        assert_eq!(picked, vec![1, 2, 3, 4]);

        let mut again = ids(&cache.sample_unique_images(10).await.unwrap());
        again.sort();
        assert_eq!(again, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_zero_count_and_empty_pool_yield_nothing() {
        let (cache, calls) = cache(images(1..=3), Duration::from_secs(300));
        assert!(cache.sample_unique_images(0).await.unwrap().is_empty());
        assert!(cache.sample_any(0).await.unwrap().is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let (videos_only, _) = cache_with_videos();
        assert!(videos_only.sample_unique_images(3).await.unwrap().is_empty());
        assert!(videos_only.sample_images(3).await.unwrap().is_empty());
    }

    fn cache_with_videos() -> (GalleryCache<CountingSource>, Arc<AtomicUsize>) {
        cache(
            vec![item(1, MediaType::Video), item(2, MediaType::Video)],
            Duration::from_secs(300),
        )
    }

    #[tokio::test]
    async fn test_type_filters() {
        let mixed = vec![
            item(1, MediaType::Image),
            item(2, MediaType::Video),
            item(3, MediaType::Image),
            item(4, MediaType::Video),
        ];
        let (cache, _) = cache(mixed, Duration::from_secs(300));

        let videos = cache.sample_videos(10).await.unwrap();
        assert_eq!(videos.len(), 2);
        assert!(videos.iter().all(|m| m.media_type == MediaType::Video));

        let pictures = cache.sample_images(10).await.unwrap();
        assert_eq!(pictures.len(), 2);
        assert!(pictures.iter().all(|m| m.media_type == MediaType::Image));

        assert_eq!(cache.sample_any(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalidate_clears_snapshot_and_exclusions() {
        let (cache, calls) = cache(images(1..=2), Duration::from_secs(300));

        cache.sample_unique_images(2).await.unwrap();
        cache.invalidate().await;

        // New snapshot and a fresh cycle: both images are available again
        let picked = cache.sample_unique_images(2).await.unwrap();
        assert_eq!(picked.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_reset_exclusions_keeps_snapshot() {
        let (cache, calls) = cache(images(1..=3), Duration::from_secs(300));

        cache.sample_unique_images(3).await.unwrap();
        cache.reset_exclusions().await;

        let mut picked = ids(&cache.sample_unique_images(3).await.unwrap());
        picked.sort();
        assert_eq!(picked, vec![1, 2, 3]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_source_errors_propagate() {
        let cache = GalleryCache::with_rng(
            FailingSource,
            Duration::from_secs(300),
            Box::new(StdRng::seed_from_u64(1)),
        );

        let err = cache.sample_any(2).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
