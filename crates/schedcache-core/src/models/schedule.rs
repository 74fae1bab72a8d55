use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::flight::{FlightRecord, FlightScope};

/// Opaque schedule id as issued by the CMS.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export, type = "string"))]
pub struct PeriodId(String);

impl PeriodId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PeriodId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for PeriodId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PeriodId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A dated season of the timetable. The date range is inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct SchedulePeriod {
    pub id: PeriodId,
    #[serde(rename = "startDate")]
    pub start_date: NaiveDate,
    #[serde(rename = "endDate")]
    pub end_date: NaiveDate,
    #[serde(rename = "snippetType", default)]
    pub snippet_type: Option<String>,
    #[serde(rename = "contentType", default)]
    pub content_type: Option<String>,
}

impl SchedulePeriod {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// "6 Jan - 30 Mar", the label used on the period selector.
    pub fn range_display(&self) -> String {
        format!(
            "{} - {}",
            self.start_date.format("%-d %b"),
            self.end_date.format("%-d %b")
        )
    }
}

/// A period together with every one of its flights, in source order.
///
/// Only ever built from a fully paginated fetch; there is no partial form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct LoadedSchedule {
    pub period: SchedulePeriod,
    pub flights: Vec<FlightRecord>,
}

/// Flights operating on one weekday, ordered by departure time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayFlights<'a> {
    pub weekday: Weekday,
    pub flights: Vec<&'a FlightRecord>,
}

impl<'a> DayFlights<'a> {
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// The day's flights split by aircraft, in order of each aircraft's
    /// first departure. Flights without one go under "Unknown Aircraft".
    /// Each group keeps the departure-time order.
    pub fn by_aircraft(&self) -> Vec<(&'a str, Vec<&'a FlightRecord>)> {
        let mut groups: Vec<(&'a str, Vec<&'a FlightRecord>)> = Vec::new();
        for &flight in &self.flights {
            let aircraft = flight.aircraft_display();
            match groups.iter_mut().find(|(name, _)| *name == aircraft) {
                Some((_, flights)) => flights.push(flight),
                None => groups.push((aircraft, vec![flight])),
            }
        }
        groups
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl LoadedSchedule {
    pub fn id(&self) -> &PeriodId {
        &self.period.id
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Group the flights of one scope by weekday, Monday first.
    ///
    /// All seven days are always present so callers can show "no flights"
    /// rows. Flights whose day tag doesn't parse are left out.
    pub fn timetable(&self, scope: &FlightScope) -> Vec<DayFlights<'_>> {
        let mut days: Vec<DayFlights<'_>> = WEEK
            .iter()
            .map(|&weekday| DayFlights {
                weekday,
                flights: Vec::new(),
            })
            .collect();

        for flight in self.flights.iter().filter(|f| &f.scope == scope) {
            if let Some(weekday) = flight.weekday() {
                days[weekday.num_days_from_monday() as usize]
                    .flights
                    .push(flight);
            }
        }

        for day in &mut days {
            day.flights.sort_by(|a, b| {
                a.departure_time
                    .cmp(&b.departure_time)
                    .then_with(|| a.flight_number.cmp(&b.flight_number))
            });
        }

        days
    }
}
