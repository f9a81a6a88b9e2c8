//! End-to-end availability generation.
//!
//! One call runs a single sequential pipeline: validate options, build the
//! date range, obtain a client, issue one busy-time query for the whole range,
//! then enumerate slots and render every format. A call either returns a
//! complete [`AvailabilityResult`] or an error; nothing partial escapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::daterange::{build_date_range, DateRange};
use crate::error::Result;
use crate::format::{format_time, Formatter, RenderedFormats};
use crate::options::{GenerationOptions, MeetingDetails, MeetingDuration};
use crate::slots::{enumerate_days, DayAvailability};
use crate::source::{BusyTimeSource, ClientProvider};

/// Echo of the business-hours window a result was generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// `HH:MM`
    pub start: String,
    /// `HH:MM`
    pub end: String,
    pub timezone: String,
}

/// Everything produced by one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResult {
    pub generation_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub date_range: DateRange,
    pub business_hours: BusinessHours,
    pub availability: Vec<DayAvailability>,
    pub meeting: MeetingDetails,
    pub duration: MeetingDuration,
    pub formats: RenderedFormats,
    /// Set when the busy times came from a synthetic source.
    pub demo: bool,
}

impl AvailabilityResult {
    pub fn available_count(&self) -> usize {
        self.availability
            .iter()
            .map(|d| d.available_slots().count())
            .sum()
    }
}

/// Composes a client provider and a busy-time source into the pipeline.
#[derive(Debug, Clone)]
pub struct AvailabilityGenerator<A, S> {
    auth: A,
    source: S,
}

impl<A, S> AvailabilityGenerator<A, S>
where
    A: ClientProvider,
    S: BusyTimeSource,
{
    pub fn new(auth: A, source: S) -> Self {
        Self { auth, source }
    }

    /// Generate availability starting the day after the current date.
    pub async fn generate(&self, options: &GenerationOptions) -> Result<AvailabilityResult> {
        self.generate_at(options, Utc::now()).await
    }

    /// Generate availability as if the current instant were `now`.
    #[tracing::instrument(
        name = "generate",
        skip_all,
        fields(days = options.days, timezone = %options.timezone)
    )]
    pub async fn generate_at(
        &self,
        options: &GenerationOptions,
        now: DateTime<Utc>,
    ) -> Result<AvailabilityResult> {
        let tz = options.validate()?;
        let today = now.with_timezone(&tz).date_naive();
        let range = build_date_range(today, options.days, options.weekends);

        let client = self.auth.client().await.inspect_err(|e| {
            warn!(error = %e, "could not obtain calendar client");
        })?;

        let busy = match range.query_window(tz) {
            Some((start, end)) => {
                debug!(%start, %end, "querying busy times");
                self.source
                    .query_busy(&client, start, end, &options.timezone)
                    .await
                    .inspect_err(|e| warn!(error = %e, "busy-time query failed"))?
            }
            None => Vec::new(),
        };

        let availability = enumerate_days(&range, options, tz, &busy);
        let demo = self.source.is_demo();
        let formats = Formatter::new(options, tz)
            .demo(demo)
            .render_all(&availability);

        let result = AvailabilityResult {
            generation_id: Uuid::new_v4(),
            timestamp: now,
            date_range: range,
            business_hours: BusinessHours {
                start: format_time(options.business_hours_start, 0),
                end: format_time(options.business_hours_end, 0),
                timezone: options.timezone.clone(),
            },
            availability,
            meeting: options.meeting.clone(),
            duration: options.duration,
            formats,
            demo,
        };

        info!(
            generation_id = %result.generation_id,
            days = result.availability.len(),
            busy_intervals = busy.len(),
            available = result.available_count(),
            "availability generated"
        );

        Ok(result)
    }
}
