//! Paginated retrieval of one period's flights.
//!
//! The backend gives no total count, so the loop keeps asking for the next
//! page until one comes back short. A period whose flight count is an exact
//! multiple of the page size therefore costs one extra, empty request.
//! There is no page cap; a backend that keeps repeating the same full page
//! is reported as an invalid response.

use tracing::{debug, info};

use crate::api::ApiError;
use crate::models::{FlightRecord, LoadedSchedule, PeriodId};
use crate::source::ScheduleSource;

/// Who asked for the load, which decides what happens to errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// A user selected the period; errors are returned.
    Foreground,
    /// A speculative prefetch; errors are logged and reported as "not found".
    Background,
}

/// Fetch every page of `period_id` and return the period with all its flights.
///
/// Returns `Ok(None)` when the backend does not know the period. In
/// [`LoadMode::Background`] any error also becomes `Ok(None)`.
pub async fn load_flights<S: ScheduleSource + ?Sized>(
    source: &S,
    period_id: &PeriodId,
    page_size: usize,
    mode: LoadMode,
) -> Result<Option<LoadedSchedule>, ApiError> {
    match fetch_all_pages(source, period_id, page_size).await {
        Ok(loaded) => Ok(loaded),
        Err(e) => match mode {
            LoadMode::Foreground => Err(e),
            LoadMode::Background => {
                debug!(period_id = %period_id, error = %e, "Background load failed");
                Ok(None)
            }
        },
    }
}

async fn fetch_all_pages<S: ScheduleSource + ?Sized>(
    source: &S,
    period_id: &PeriodId,
    page_size: usize,
) -> Result<Option<LoadedSchedule>, ApiError> {
    let page_size = page_size.max(1);
    let mut offset = 0;
    let mut period = None;
    let mut flights = Vec::new();
    let mut last_full_page: Option<(String, String)> = None;
    let mut page_number = 0usize;

    loop {
        page_number += 1;
        debug!(period_id = %period_id, page = page_number, offset, limit = page_size, "Requesting flight page");

        let Some(page) = source.fetch_flight_page(period_id, page_size, offset).await? else {
            debug!(period_id = %period_id, "Period unknown to source");
            return Ok(None);
        };

        let received = page.flights.len();
        if received >= page_size {
            // A full page identical to the previous one means the backend is
            // ignoring the offset and would never return a short page.
            let bounds = page_bounds(&page.flights);
            if bounds.is_some() && bounds == last_full_page {
                return Err(ApiError::InvalidResponse(format!(
                    "period {} returned the same page again at offset {}",
                    period_id, offset
                )));
            }
            last_full_page = bounds;
        }

        flights.extend(page.flights);
        // Metadata comes from the first page; later pages repeat it.
        let period = period.get_or_insert(page.period);

        if received < page_size {
            info!(period_id = %period.id, count = flights.len(), pages = page_number, "Schedule loaded");
            return Ok(Some(LoadedSchedule {
                period: period.clone(),
                flights,
            }));
        }

        offset += page_size;
    }
}

/// First and last flight ids of a page.
fn page_bounds(flights: &[FlightRecord]) -> Option<(String, String)> {
    Some((flights.first()?.id.clone(), flights.last()?.id.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::mock::{date, MockSource};

    async fn load(source: &MockSource, id: &str, page_size: usize) -> Option<LoadedSchedule> {
        load_flights(source, &PeriodId::from(id), page_size, LoadMode::Foreground)
            .await
            .expect("load should succeed")
    }

    #[tokio::test]
    async fn test_partial_last_page() {
        let source = MockSource::new().with_period("1", date(2025, 1, 1), date(2025, 3, 31), 150);

        let loaded = load(&source, "1", 100).await.expect("period exists");
        assert_eq!(loaded.len(), 150);
        assert_eq!(source.requests_for("1"), 2);
        assert_eq!(loaded.flights, source.flights_of("1"));

        let offsets: Vec<usize> = source.requests().iter().map(|r| r.offset).collect();
        assert_eq!(offsets, vec![0, 100]);
        assert!(source.requests().iter().all(|r| r.limit == 100));
    }

    #[tokio::test]
    async fn test_exact_multiple_costs_one_empty_page() {
        let source = MockSource::new().with_period("1", date(2025, 1, 1), date(2025, 3, 31), 200);

        let loaded = load(&source, "1", 100).await.expect("period exists");
        assert_eq!(loaded.len(), 200);
        assert_eq!(source.requests_for("1"), 3);
    }

    #[tokio::test]
    async fn test_request_counts_across_sizes() {
        for (count, page_size, expected) in [(0, 100, 1), (1, 100, 1), (99, 100, 1), (100, 100, 2), (101, 100, 2), (7, 3, 3), (9, 3, 4)] {
            let source = MockSource::new().with_period("p", date(2025, 1, 1), date(2025, 1, 31), count);
            let loaded = load(&source, "p", page_size).await.expect("period exists");
            assert_eq!(loaded.len(), count, "flights for N={} P={}", count, page_size);
            assert_eq!(source.requests_for("p"), expected, "requests for N={} P={}", count, page_size);
        }
    }

    #[tokio::test]
    async fn test_empty_period_is_not_unknown() {
        let source = MockSource::new().with_period("empty", date(2025, 1, 1), date(2025, 1, 31), 0);
        let loaded = load(&source, "empty", 100).await.expect("empty period still exists");
        assert!(loaded.is_empty());
        assert_eq!(loaded.period.id.as_str(), "empty");
    }

    #[tokio::test]
    async fn test_unknown_period() {
        let source = MockSource::five_periods(10);
        assert!(load(&source, "99", 100).await.is_none());
        assert_eq!(source.requests_for("99"), 1);
    }

    #[tokio::test]
    async fn test_repeat_loads_are_identical() {
        let source = MockSource::five_periods(250);
        let first = load(&source, "2", 100).await.expect("period exists");
        let second = load(&source, "2", 100).await.expect("period exists");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_foreground_error_propagates() {
        let source = MockSource::five_periods(150).failing_page("3", 100);
        let result = load_flights(&source, &PeriodId::from("3"), 100, LoadMode::Foreground).await;
        assert!(matches!(result, Err(ApiError::ServerError(_))));
        assert_eq!(source.requests_for("3"), 2);
    }

    #[tokio::test]
    async fn test_background_error_is_swallowed() {
        let source = MockSource::five_periods(150).failing_page("3", 100);
        let result = load_flights(&source, &PeriodId::from("3"), 100, LoadMode::Background).await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_zero_page_size_is_clamped() {
        let source = MockSource::new().with_period("1", date(2025, 1, 1), date(2025, 1, 31), 2);
        let loaded = load(&source, "1", 0).await.expect("period exists");
        assert_eq!(loaded.len(), 2);
        assert_eq!(source.requests_for("1"), 3);
    }

    #[tokio::test]
    async fn test_large_period_with_single_flight_pages() {
        let source = MockSource::new().with_period("1", date(2025, 1, 1), date(2025, 12, 31), 1000);
        let loaded = load(&source, "1", 1).await.expect("period exists");
        assert_eq!(loaded.len(), 1000);
        assert_eq!(loaded.flights, source.flights_of("1"));
        assert_eq!(source.requests_for("1"), 1001);
    }

    #[tokio::test]
    async fn test_source_ignoring_offset_is_an_error() {
        let source = MockSource::five_periods(0).endless("1");
        let result = load_flights(&source, &PeriodId::from("1"), 5, LoadMode::Foreground).await;
        assert!(matches!(result, Err(ApiError::InvalidResponse(_))));
        assert_eq!(source.requests_for("1"), 2);
    }
}
