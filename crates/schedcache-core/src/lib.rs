//! Core library for schedcache.
//!
//! Loads a seasonal flight timetable from a headless CMS in bounded pages,
//! keeps each fully loaded schedule period for the rest of the session, and
//! warms the periods on either side of the one being viewed in the background.
//!
//! The usual entry point is [`ScheduleSession`]:
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use schedcache_core::{ApiClient, Config, ScheduleSession};
//!
//! let config = Config::load()?;
//! let client = ApiClient::from_config(&config)?;
//! let mut session = ScheduleSession::open(client, &config).await;
//!
//! if let Some(period) = session.index().periods().first().cloned() {
//!     let schedule = session.select(&period.id).await?;
//!     println!("{} flights", schedule.map(|s| s.len()).unwrap_or(0));
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod index;
pub mod loader;
pub mod models;
pub mod prefetch;
pub mod session;
pub mod source;

pub use api::{ApiClient, ApiError};
pub use cache::{CachedSchedule, LoadedPeriodCache};
pub use config::Config;
pub use index::MetadataIndex;
pub use loader::{load_flights, LoadMode};
pub use models::{DayFlights, FlightRecord, FlightScope, LoadedSchedule, PeriodId, SchedulePeriod};
pub use prefetch::{PrefetchOutcome, PrefetchScheduler};
pub use session::ScheduleSession;
pub use source::{FlightPage, ScheduleSource};
