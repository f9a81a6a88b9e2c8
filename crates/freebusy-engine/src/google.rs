//! Google Calendar FreeBusy source.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, Result};
use crate::slots::BusyInterval;
use crate::source::{AuthenticatedClient, BusyTimeSource};

pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Queries `POST /freeBusy` for a single calendar.
#[derive(Debug, Clone)]
pub struct GoogleFreeBusySource {
    http: Client,
    base_url: String,
    calendar_id: String,
}

impl Default for GoogleFreeBusySource {
    fn default() -> Self {
        Self::new(GOOGLE_CALENDAR_API_BASE)
    }
}

impl GoogleFreeBusySource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            calendar_id: "primary".to_string(),
        }
    }

    pub fn with_calendar(mut self, calendar_id: impl Into<String>) -> Self {
        self.calendar_id = calendar_id.into();
        self
    }

    pub fn with_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }
}

#[async_trait]
impl BusyTimeSource for GoogleFreeBusySource {
    async fn query_busy(
        &self,
        client: &AuthenticatedClient,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &str,
    ) -> Result<Vec<BusyInterval>> {
        let url = format!("{}/freeBusy", self.base_url);
        let body = FreeBusyRequest {
            time_min: start,
            time_max: end,
            time_zone: timezone,
            items: vec![FreeBusyItem {
                id: &self.calendar_id,
            }],
        };

        debug!(%url, calendar_id = %self.calendar_id, "querying free/busy");
        let response = self
            .http
            .post(&url)
            .bearer_auth(client.access_token())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "free/busy query rejected");
            if status == StatusCode::UNAUTHORIZED {
                return Err(EngineError::NotAuthenticated(format!(
                    "Google rejected the access token: {}",
                    error_text
                )));
            }
            return Err(EngineError::Provider(format!(
                "Google API error ({}): {}",
                status, error_text
            )));
        }

        let parsed: FreeBusyResponse = response.json().await?;
        let calendar = parsed
            .calendars
            .get(&self.calendar_id)
            .ok_or_else(|| {
                EngineError::Provider(format!(
                    "calendar '{}' missing from free/busy response",
                    self.calendar_id
                ))
            })?;

        if let Some(err) = calendar.errors.first() {
            return Err(EngineError::Provider(format!(
                "calendar '{}' unavailable: {} ({})",
                self.calendar_id, err.reason, err.domain
            )));
        }

        Ok(calendar
            .busy
            .iter()
            .map(|b| BusyInterval {
                start: b.start,
                end: b.end,
            })
            .collect())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FreeBusyRequest<'a> {
    time_min: DateTime<Utc>,
    time_max: DateTime<Utc>,
    time_zone: &'a str,
    items: Vec<FreeBusyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct FreeBusyItem<'a> {
    id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FreeBusyResponse {
    #[serde(default)]
    calendars: HashMap<String, FreeBusyCalendar>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyCalendar {
    #[serde(default)]
    busy: Vec<FreeBusyPeriod>,
    #[serde(default)]
    errors: Vec<FreeBusyError>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyPeriod {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct FreeBusyError {
    #[serde(default)]
    domain: String,
    #[serde(default)]
    reason: String,
}
