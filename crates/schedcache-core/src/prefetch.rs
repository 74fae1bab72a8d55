//! Background warming of the periods next to the one being viewed.
//!
//! Each neighbor load runs in its own tokio task so a slow or failing period
//! never holds up another. Tasks do not touch the cache: they report a
//! [`PrefetchOutcome`] over a channel and the owning session applies it.

use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::LoadedPeriodCache;
use crate::index::MetadataIndex;
use crate::loader::{load_flights, LoadMode};
use crate::models::{LoadedSchedule, PeriodId};
use crate::source::ScheduleSource;

/// Result of one background load, sent back to the session.
#[derive(Debug)]
pub enum PrefetchOutcome {
    /// Every page arrived.
    Loaded(LoadedSchedule),
    /// The load failed or the period was unknown. Nothing is cached, so a
    /// later selection fetches it again.
    NotLoaded(PeriodId),
}

pub struct PrefetchScheduler<S> {
    source: Arc<S>,
    page_size: usize,
    tx: mpsc::UnboundedSender<PrefetchOutcome>,
    in_flight: Vec<JoinHandle<()>>,
}

impl<S: ScheduleSource> PrefetchScheduler<S> {
    /// Create a scheduler and the receiving end its tasks report to.
    pub fn new(
        source: Arc<S>,
        page_size: usize,
    ) -> (Self, mpsc::UnboundedReceiver<PrefetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            source,
            page_size,
            tx,
            in_flight: Vec::new(),
        };
        (scheduler, rx)
    }

    /// Start background loads for the periods directly before and after
    /// `current` that are not yet in `cache`. Returns the ids that were started.
    ///
    /// Nothing is awaited here. Must be called from within a tokio runtime.
    pub fn prefetch_neighbors(
        &mut self,
        index: &MetadataIndex,
        current: &PeriodId,
        cache: &LoadedPeriodCache,
    ) -> Vec<PeriodId> {
        self.in_flight.retain(|handle| !handle.is_finished());

        let targets: Vec<PeriodId> = index
            .neighbors(current)
            .into_iter()
            .filter(|p| !cache.has(&p.id))
            .map(|p| p.id.clone())
            .collect();

        for id in &targets {
            debug!(period_id = %id, current = %current, "Prefetching neighbor");
            self.in_flight.push(self.spawn_load(id.clone()));
        }

        targets
    }

    fn spawn_load(&self, period_id: PeriodId) -> JoinHandle<()> {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let page_size = self.page_size;

        tokio::spawn(async move {
            let outcome = match load_flights(&*source, &period_id, page_size, LoadMode::Background).await {
                Ok(Some(schedule)) => PrefetchOutcome::Loaded(schedule),
                Ok(None) | Err(_) => PrefetchOutcome::NotLoaded(period_id),
            };

            if let Err(e) = tx.send(outcome) {
                warn!(error = %e, "Failed to send prefetch result - channel closed");
            }
        })
    }

    /// Number of prefetch tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Wait for every prefetch task started so far.
    pub async fn join_all(&mut self) {
        let handles = std::mem::take(&mut self.in_flight);
        for result in join_all(handles).await {
            if let Err(e) = result {
                warn!(error = %e, "Prefetch task did not complete");
            }
        }
    }
}
