//! GraphQL client module for the timetable CMS.
//!
//! This module provides the `ApiClient`, the production
//! [`ScheduleSource`](crate::source::ScheduleSource), which talks to the
//! headless CMS that publishes schedule snippets and their flights.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
