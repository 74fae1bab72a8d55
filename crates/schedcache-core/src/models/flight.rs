use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Whether a flight crosses a border. The CMS stores this as free text, so
/// anything other than the two known labels is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export, type = "string"))]
pub enum FlightScope {
    International,
    Domestic,
    Other(String),
}

impl From<String> for FlightScope {
    fn from(s: String) -> Self {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("international") {
            FlightScope::International
        } else if trimmed.eq_ignore_ascii_case("domestic") {
            FlightScope::Domestic
        } else {
            FlightScope::Other(s)
        }
    }
}

impl From<FlightScope> for String {
    fn from(scope: FlightScope) -> Self {
        match scope {
            FlightScope::International => "International".to_string(),
            FlightScope::Domestic => "Domestic".to_string(),
            FlightScope::Other(s) => s,
        }
    }
}

impl std::fmt::Display for FlightScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightScope::International => write!(f, "International"),
            FlightScope::Domestic => write!(f, "Domestic"),
            FlightScope::Other(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for FlightScope {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FlightScope::from(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct FlightRecord {
    pub id: String,
    /// Day-of-week tag as entered in the CMS, e.g. "Monday".
    pub day: String,
    #[serde(default)]
    pub aircraft: Option<String>,
    #[serde(rename = "flightNumber")]
    pub flight_number: String,
    #[serde(rename = "departurePort")]
    pub departure_port: String,
    #[serde(rename = "arrivalPort")]
    pub arrival_port: String,
    /// Local time, HHMM
    #[serde(rename = "departureTime")]
    pub departure_time: String,
    #[serde(rename = "arrivalTime")]
    pub arrival_time: String,
    #[serde(rename = "flightScope")]
    pub scope: FlightScope,
}

impl FlightRecord {
    /// Parse the day tag. Accepts full and abbreviated English names in any case.
    pub fn weekday(&self) -> Option<Weekday> {
        self.day.trim().parse().ok()
    }

    pub fn route_display(&self) -> String {
        format!("{} -> {}", self.departure_port, self.arrival_port)
    }

    pub fn aircraft_display(&self) -> &str {
        self.aircraft.as_deref().unwrap_or("Unknown Aircraft")
    }
}
