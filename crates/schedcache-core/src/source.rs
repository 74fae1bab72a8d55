//! The remote side of the timetable.
//!
//! `ScheduleSource` is the seam between the caching engine and whatever
//! actually serves schedule data. The production implementation is
//! [`crate::api::ApiClient`]; tests use an in-memory double.

use std::future::Future;

use crate::api::ApiError;
use crate::models::{FlightRecord, PeriodId, SchedulePeriod};

/// One page of flights, with the metadata of the period it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightPage {
    pub period: SchedulePeriod,
    pub flights: Vec<FlightRecord>,
}

/// Read-only query surface of the schedule backend.
pub trait ScheduleSource: Send + Sync + 'static {
    /// Metadata for every schedule period, in whatever order the backend uses.
    fn list_periods(&self) -> impl Future<Output = Result<Vec<SchedulePeriod>, ApiError>> + Send;

    /// One page of a period's flights. `Ok(None)` means the period id is
    /// unknown to the backend, which is different from a page with no flights.
    fn fetch_flight_page(
        &self,
        period_id: &PeriodId,
        limit: usize,
        offset: usize,
    ) -> impl Future<Output = Result<Option<FlightPage>, ApiError>> + Send;
}
