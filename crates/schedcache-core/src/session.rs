//! The timetable as a page sees it for one browsing session.
//!
//! A `ScheduleSession` owns the period index and the loaded-period cache.
//! Selecting a period loads it in the foreground (or serves it from the cache)
//! and then warms the neighboring periods in the background. Background
//! results are applied to the cache only by the session itself, each time it
//! is asked for data, so the cache is never shared across tasks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::ApiError;
use crate::cache::LoadedPeriodCache;
use crate::config::Config;
use crate::index::MetadataIndex;
use crate::loader::{load_flights, LoadMode};
use crate::models::{LoadedSchedule, PeriodId};
use crate::prefetch::{PrefetchOutcome, PrefetchScheduler};
use crate::source::ScheduleSource;

pub struct ScheduleSession<S> {
    source: Arc<S>,
    index: MetadataIndex,
    cache: LoadedPeriodCache,
    prefetcher: PrefetchScheduler<S>,
    outcomes: mpsc::UnboundedReceiver<PrefetchOutcome>,
    page_size: usize,
    prefetch_enabled: bool,
}

impl<S: ScheduleSource> ScheduleSession<S> {
    /// Load the period index and start an empty session.
    pub async fn open(source: S, config: &Config) -> Self {
        let index = MetadataIndex::load(&source).await;
        Self::with_index(source, index, config)
    }

    /// Start a session over an index that was already fetched.
    pub fn with_index(source: S, index: MetadataIndex, config: &Config) -> Self {
        let source = Arc::new(source);
        let page_size = config.page_size.max(1);
        let (prefetcher, outcomes) = PrefetchScheduler::new(Arc::clone(&source), page_size);

        Self {
            source,
            index,
            cache: LoadedPeriodCache::new(),
            prefetcher,
            outcomes,
            page_size,
            prefetch_enabled: config.prefetch,
        }
    }

    pub fn index(&self) -> &MetadataIndex {
        &self.index
    }

    pub fn cache(&self) -> &LoadedPeriodCache {
        &self.cache
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Whether `id` is cached. Background results not yet applied by
    /// [`poll_background`](Self::poll_background) are not counted.
    pub fn is_loaded(&self, id: &PeriodId) -> bool {
        self.cache.has(id)
    }

    pub fn prefetches_in_flight(&self) -> usize {
        self.prefetcher.in_flight()
    }

    /// Apply every finished background load to the cache. Returns how many
    /// periods were added.
    pub fn poll_background(&mut self) -> usize {
        let mut added = 0;
        while let Ok(outcome) = self.outcomes.try_recv() {
            match outcome {
                PrefetchOutcome::Loaded(schedule) => {
                    debug!(period_id = %schedule.id(), count = schedule.len(), "Prefetched schedule cached");
                    self.cache.put(schedule, LoadMode::Background);
                    added += 1;
                }
                PrefetchOutcome::NotLoaded(id) => {
                    debug!(period_id = %id, "Prefetch produced nothing, leaving cache unchanged");
                }
            }
        }
        added
    }

    /// Wait for all in-flight prefetches and apply their results.
    pub async fn settle(&mut self) -> usize {
        self.prefetcher.join_all().await;
        self.poll_background()
    }

    /// The complete schedule for `id`, from the cache when present and
    /// otherwise from a foreground load, whose errors are returned.
    /// `Ok(None)` means the source does not know the period.
    pub async fn schedule(&mut self, id: &PeriodId) -> Result<Option<Arc<LoadedSchedule>>, ApiError> {
        self.poll_background();

        if let Some(cached) = self.cache.get(id) {
            debug!(period_id = %id, "Schedule served from cache");
            return Ok(Some(cached));
        }

        info!(period_id = %id, page_size = self.page_size, "Loading schedule");
        let loaded = load_flights(&*self.source, id, self.page_size, LoadMode::Foreground).await?;

        // A prefetch for the same period may have landed while we waited.
        self.poll_background();

        Ok(loaded.map(|schedule| self.cache.put(schedule, LoadMode::Foreground)))
    }

    /// Selection-changed hook: load `id`, then prefetch its neighbors.
    ///
    /// Neighbors are only considered after the selected period is available,
    /// whether it came from the cache or the network.
    pub async fn select(&mut self, id: &PeriodId) -> Result<Option<Arc<LoadedSchedule>>, ApiError> {
        let schedule = self.schedule(id).await?;

        if schedule.is_some() && self.prefetch_enabled {
            let started = self.prefetcher.prefetch_neighbors(&self.index, id, &self.cache);
            if !started.is_empty() {
                debug!(period_id = %id, neighbors = started.len(), "Neighbor prefetch started");
            }
        }

        Ok(schedule)
    }
}
