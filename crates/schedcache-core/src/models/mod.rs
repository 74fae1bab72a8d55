//! Data models for the flight timetable.
//!
//! - `SchedulePeriod`, `PeriodId`: a dated season that flights are grouped under
//! - `FlightRecord`, `FlightScope`: one scheduled flight entry
//! - `LoadedSchedule`, `DayFlights`: a period with its complete flight list,
//!   and the per-weekday view over it

pub mod flight;
pub mod schedule;

pub use flight::{FlightRecord, FlightScope};
pub use schedule::{DayFlights, LoadedSchedule, PeriodId, SchedulePeriod};
