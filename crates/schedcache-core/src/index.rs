//! The list of schedule periods known to this session.
//!
//! Fetched once when a session opens and never refreshed. Periods are kept in
//! start-date order, which is what "previous" and "next" period mean for
//! prefetching.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::models::{PeriodId, SchedulePeriod};
use crate::source::ScheduleSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataIndex {
    periods: Vec<SchedulePeriod>,
}

impl MetadataIndex {
    /// Fetch the period list. A failed fetch yields an empty index, which
    /// leaves nothing to select but keeps the caller running.
    pub async fn load<S: ScheduleSource>(source: &S) -> Self {
        match source.list_periods().await {
            Ok(periods) => {
                let index = Self::from_periods(periods);
                info!(count = index.len(), "Schedule index loaded");
                index
            }
            Err(e) => {
                warn!(error = %e, "Failed to load schedule index, continuing without schedules");
                Self::default()
            }
        }
    }

    /// Build an index, sorting by start date. The sort is stable, so periods
    /// that start on the same day keep the order the source gave them.
    pub fn from_periods(mut periods: Vec<SchedulePeriod>) -> Self {
        periods.sort_by_key(|p| p.start_date);
        Self { periods }
    }

    pub fn periods(&self) -> &[SchedulePeriod] {
        &self.periods
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn position(&self, id: &PeriodId) -> Option<usize> {
        self.periods.iter().position(|p| &p.id == id)
    }

    pub fn get(&self, id: &PeriodId) -> Option<&SchedulePeriod> {
        self.periods.iter().find(|p| &p.id == id)
    }

    /// The periods directly before and after `id`, in that order. Empty when
    /// `id` is unknown.
    pub fn neighbors(&self, id: &PeriodId) -> Vec<&SchedulePeriod> {
        let Some(pos) = self.position(id) else {
            return Vec::new();
        };

        let before = pos.checked_sub(1).and_then(|i| self.periods.get(i));
        let after = self.periods.get(pos + 1);
        before.into_iter().chain(after).collect()
    }

    pub fn containing(&self, date: NaiveDate) -> Option<&SchedulePeriod> {
        self.periods.iter().find(|p| p.contains(date))
    }

    /// The period in effect on `today`, else the earliest one.
    pub fn default_selection(&self, today: NaiveDate) -> Option<&SchedulePeriod> {
        self.containing(today).or_else(|| self.periods.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::{date, MockSource};

    fn ids(periods: &[&SchedulePeriod]) -> Vec<String> {
        periods.iter().map(|p| p.id.to_string()).collect()
    }

    fn four_periods() -> MetadataIndex {
        // Ids deliberately out of date order.
        let source_order = vec![
            period("a", date(2025, 7, 1), date(2025, 9, 30)),
            period("b", date(2025, 1, 1), date(2025, 3, 31)),
            period("c", date(2025, 10, 1), date(2025, 12, 31)),
            period("d", date(2025, 4, 1), date(2025, 6, 30)),
        ];
        MetadataIndex::from_periods(source_order)
    }

    fn period(id: &str, start: NaiveDate, end: NaiveDate) -> SchedulePeriod {
        SchedulePeriod {
            id: PeriodId::from(id),
            start_date: start,
            end_date: end,
            snippet_type: None,
            content_type: None,
        }
    }

    #[test]
    fn test_sorted_by_start_date() {
        let index = four_periods();
        let order: Vec<&str> = index.periods().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_equal_start_dates_keep_source_order() {
        let index = MetadataIndex::from_periods(vec![
            period("x", date(2025, 1, 1), date(2025, 1, 31)),
            period("y", date(2025, 1, 1), date(2025, 2, 28)),
        ]);
        assert_eq!(index.position(&PeriodId::from("x")), Some(0));
        assert_eq!(index.position(&PeriodId::from("y")), Some(1));
    }

    #[test]
    fn test_neighbors_middle_first_last() {
        let index = four_periods();
        // Sorted: b, d, a, c
        assert_eq!(ids(&index.neighbors(&PeriodId::from("d"))), vec!["b", "a"]);
        assert_eq!(ids(&index.neighbors(&PeriodId::from("b"))), vec!["d"]);
        assert_eq!(ids(&index.neighbors(&PeriodId::from("c"))), vec!["a"]);
    }

    #[test]
    fn test_neighbors_unknown_or_single() {
        let index = four_periods();
        assert!(index.neighbors(&PeriodId::from("zzz")).is_empty());

        let single = MetadataIndex::from_periods(vec![period("only", date(2025, 1, 1), date(2025, 12, 31))]);
        assert!(single.neighbors(&PeriodId::from("only")).is_empty());
    }

    #[test]
    fn test_default_selection() {
        let index = four_periods();
        let in_august = index.default_selection(date(2025, 8, 15)).expect("non-empty index");
        assert_eq!(in_august.id.as_str(), "a");

        let before_all = index.default_selection(date(2024, 6, 1)).expect("non-empty index");
        assert_eq!(before_all.id.as_str(), "b");

        assert!(MetadataIndex::default().default_selection(date(2025, 1, 1)).is_none());
    }

    #[tokio::test]
    async fn test_load_sorts_source_listing() {
        let source = MockSource::new()
            .with_period("1", date(2025, 6, 1), date(2025, 6, 30), 0)
            .with_period("2", date(2025, 1, 1), date(2025, 5, 31), 0);

        let index = MetadataIndex::load(&source).await;
        assert_eq!(source.listings(), 1);
        assert_eq!(index.periods()[0].id.as_str(), "2");
        assert_eq!(index.periods()[1].id.as_str(), "1");
    }

    #[tokio::test]
    async fn test_load_failure_degrades_to_empty() {
        let source = MockSource::five_periods(10).failing_listing();
        let index = MetadataIndex::load(&source).await;
        assert!(index.is_empty());
        assert_eq!(source.total_requests(), 0);
    }
}
