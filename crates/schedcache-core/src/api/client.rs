//! GraphQL client for the CMS that publishes the flight timetable.
//!
//! The CMS exposes schedules as snippets. Both queries below go to the same
//! endpoint as a JSON POST.

use std::time::Duration;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{FlightRecord, PeriodId, SchedulePeriod};
use crate::source::{FlightPage, ScheduleSource};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

const PERIODS_QUERY: &str = "\
query SchedulePeriods {
  schedules {
    id
    startDate
    endDate
    snippetType
    contentType
  }
}";

const FLIGHT_PAGE_QUERY: &str = "\
query ScheduleFlights($id: ID!, $limit: Int!, $offset: Int!) {
  schedule(id: $id) {
    id
    startDate
    endDate
    snippetType
    contentType
    flights(limit: $limit, offset: $offset) {
      id
      day
      aircraft
      flightNumber
      departurePort
      arrivalPort
      departureTime
      arrivalTime
      flightScope
    }
  }
}";

// ============================================================================
// Wire types - internal only
// ============================================================================

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    #[serde(rename = "operationName")]
    operation_name: &'a str,
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

#[derive(Debug, Serialize)]
struct FlightPageVariables<'a> {
    id: &'a str,
    limit: usize,
    offset: usize,
}

#[derive(Debug, Deserialize)]
struct PeriodsData {
    #[serde(default)]
    schedules: Vec<SchedulePeriod>,
}

#[derive(Debug, Deserialize)]
struct FlightPageData {
    schedule: Option<ScheduleWithFlights>,
}

#[derive(Debug, Deserialize)]
struct ScheduleWithFlights {
    #[serde(flatten)]
    period: SchedulePeriod,
    #[serde(default)]
    flights: Vec<FlightRecord>,
}

/// Client for the CMS GraphQL endpoint.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(
        response: reqwest::Response,
    ) -> Result<Option<reqwest::Response>, ApiError> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Unwrap a GraphQL response body into its `data` payload.
    fn decode<T: DeserializeOwned>(operation: &str, body: &str) -> Result<T, ApiError> {
        let parsed: GraphQlResponse<T> = serde_json::from_str(body).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse {} response: {}", operation, e))
        })?;

        if !parsed.errors.is_empty() {
            return Err(ApiError::from_graphql(
                parsed.errors.iter().map(|e| e.message.as_str()),
            ));
        }

        parsed
            .data
            .ok_or_else(|| ApiError::InvalidResponse(format!("{} response has no data", operation)))
    }

    async fn query<T: DeserializeOwned, V: Serialize>(
        &self,
        operation: &str,
        query: &str,
        variables: V,
    ) -> Result<T, ApiError> {
        let request = GraphQlRequest {
            operation_name: operation,
            query,
            variables,
        };

        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let response = self
                .client
                .post(&self.endpoint)
                .header(header::ACCEPT, "application/json")
                .json(&request)
                .send()
                .await?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => {
                    let body = response.text().await?;
                    return Self::decode(operation, &body);
                }
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited);
                    }
                    warn!(operation, retry = retries, backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2; // Exponential backoff
                }
            }
        }
    }

    fn into_page(data: FlightPageData) -> Option<FlightPage> {
        data.schedule.map(|s| FlightPage {
            period: s.period,
            flights: s.flights,
        })
    }
}

impl ScheduleSource for ApiClient {
    async fn list_periods(&self) -> Result<Vec<SchedulePeriod>, ApiError> {
        let data: PeriodsData = self.query("SchedulePeriods", PERIODS_QUERY, ()).await?;
        debug!(count = data.schedules.len(), "Schedule periods fetched");
        Ok(data.schedules)
    }

    async fn fetch_flight_page(
        &self,
        period_id: &PeriodId,
        limit: usize,
        offset: usize,
    ) -> Result<Option<FlightPage>, ApiError> {
        let variables = FlightPageVariables {
            id: period_id.as_str(),
            limit,
            offset,
        };
        let data: FlightPageData = self
            .query("ScheduleFlights", FLIGHT_PAGE_QUERY, variables)
            .await?;
        Ok(Self::into_page(data))
    }
}
