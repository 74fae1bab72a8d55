//! In-memory record of the periods fully loaded this session.
//!
//! An entry exists only once every page of a period has been fetched. Entries
//! are never evicted; a session only ever touches a handful of periods.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::loader::LoadMode;
use crate::models::{LoadedSchedule, PeriodId};

#[derive(Debug, Clone)]
pub struct CachedSchedule {
    pub schedule: Arc<LoadedSchedule>,
    pub cached_at: DateTime<Utc>,
    /// Whether a user selection or a prefetch brought this period in.
    pub origin: LoadMode,
}

impl CachedSchedule {
    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.cached_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LoadedPeriodCache {
    entries: HashMap<PeriodId, CachedSchedule>,
}

impl LoadedPeriodCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, id: &PeriodId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &PeriodId) -> Option<Arc<LoadedSchedule>> {
        self.entries.get(id).map(|e| Arc::clone(&e.schedule))
    }

    pub fn entry(&self, id: &PeriodId) -> Option<&CachedSchedule> {
        self.entries.get(id)
    }

    /// Record a fully loaded period. A second put for the same period
    /// replaces the first; both came from the same immutable source data.
    pub fn put(&mut self, schedule: LoadedSchedule, origin: LoadMode) -> Arc<LoadedSchedule> {
        let schedule = Arc::new(schedule);
        self.entries.insert(
            schedule.period.id.clone(),
            CachedSchedule {
                schedule: Arc::clone(&schedule),
                cached_at: Utc::now(),
                origin,
            },
        );
        schedule
    }

    /// Loaded period ids, sorted for stable output.
    pub fn loaded_ids(&self) -> Vec<PeriodId> {
        let mut ids: Vec<PeriodId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SchedulePeriod;
    use crate::source::mock::{date, make_flights};
    use chrono::Duration;

    fn schedule(id: &str, flights: usize) -> LoadedSchedule {
        LoadedSchedule {
            period: SchedulePeriod {
                id: PeriodId::from(id),
                start_date: date(2025, 1, 1),
                end_date: date(2025, 3, 31),
                snippet_type: None,
                content_type: None,
            },
            flights: make_flights(id, flights),
        }
    }

    #[test]
    fn test_put_then_get() {
        let mut cache = LoadedPeriodCache::new();
        let id = PeriodId::from("4");
        assert!(!cache.has(&id));
        assert!(cache.get(&id).is_none());

        let stored = cache.put(schedule("4", 3), LoadMode::Background);
        assert!(cache.has(&id));
        let fetched = cache.get(&id).expect("just stored");
        assert!(Arc::ptr_eq(&stored, &fetched));
        assert_eq!(fetched.len(), 3);
        assert_eq!(cache.entry(&id).map(|e| e.origin), Some(LoadMode::Background));
    }

    #[test]
    fn test_duplicate_put_replaces() {
        let mut cache = LoadedPeriodCache::new();
        cache.put(schedule("1", 2), LoadMode::Background);
        cache.put(schedule("1", 2), LoadMode::Foreground);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.entry(&PeriodId::from("1")).map(|e| e.origin), Some(LoadMode::Foreground));
    }

    #[test]
    fn test_loaded_ids_sorted() {
        let mut cache = LoadedPeriodCache::new();
        cache.put(schedule("3", 0), LoadMode::Foreground);
        cache.put(schedule("1", 0), LoadMode::Background);
        assert_eq!(cache.loaded_ids(), vec![PeriodId::from("1"), PeriodId::from("3")]);
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_age_display() {
        let mut cache = LoadedPeriodCache::new();
        cache.put(schedule("1", 0), LoadMode::Foreground);
        let mut entry = cache.entry(&PeriodId::from("1")).cloned().expect("just stored");
        assert_eq!(entry.age_display(), "just now");

        entry.cached_at = Utc::now() - Duration::minutes(5);
        assert_eq!(entry.age_display(), "5m ago");

        entry.cached_at = Utc::now() - Duration::minutes(95);
        assert_eq!(entry.age_display(), "2h ago");
    }
}
