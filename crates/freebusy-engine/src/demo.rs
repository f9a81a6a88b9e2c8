//! Synthetic busy times for trying the tool without calendar access.
//!
//! The first three offered dates of the query window each get a fixed set of
//! local-time meetings. Later dates are free. Dates the weekend policy
//! excludes are not counted, so a Friday request still fills Monday.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::daterange::is_included;
use crate::dst::{resolve_local, DstPolicy};
use crate::error::{EngineError, Result};
use crate::options::WeekendPolicy;
use crate::slots::BusyInterval;
use crate::source::{AuthenticatedClient, BusyTimeSource};

/// Local `(start, end)` hour/minute pairs per offered date.
const PATTERNS: [&[((u32, u32), (u32, u32))]; 3] = [
    &[((10, 0), (11, 0)), ((14, 0), (15, 0))],
    &[((9, 30), (10, 0)), ((15, 30), (17, 0))],
    &[((11, 0), (12, 0))],
];

#[derive(Debug, Clone, Copy, Default)]
pub struct DemoBusySource {
    weekends: WeekendPolicy,
}

impl DemoBusySource {
    /// `weekends` should match the policy the dates were built with.
    pub fn new(weekends: WeekendPolicy) -> Self {
        Self { weekends }
    }

    /// Demo intervals for the local dates of `[start, end)` in `tz`.
    pub fn intervals(
        &self,
        tz: Tz,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<BusyInterval> {
        let first_day = start.with_timezone(&tz).date_naive();
        let after_last = end.with_timezone(&tz).date_naive();

        first_day
            .iter_days()
            .take_while(|day| *day < after_last)
            .filter(|day| is_included(*day, self.weekends))
            .zip(PATTERNS.iter())
            .flat_map(|(day, pattern)| {
                pattern.iter().filter_map(move |&((sh, sm), (eh, em))| {
                    let from = resolve_local(
                        tz,
                        day.and_time(NaiveTime::from_hms_opt(sh, sm, 0)?),
                        DstPolicy::ShiftForward,
                    )?;
                    let to = resolve_local(
                        tz,
                        day.and_time(NaiveTime::from_hms_opt(eh, em, 0)?),
                        DstPolicy::ShiftForward,
                    )?;
                    Some(BusyInterval {
                        start: from,
                        end: to,
                    })
                })
            })
            .filter(|b| b.start < end && b.end > start)
            .collect()
    }
}

#[async_trait]
impl BusyTimeSource for DemoBusySource {
    async fn query_busy(
        &self,
        _client: &AuthenticatedClient,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &str,
    ) -> Result<Vec<BusyInterval>> {
        let tz: Tz = timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(timezone.to_string()))?;
        let busy = self.intervals(tz, start, end);
        tracing::debug!(intervals = busy.len(), "generated demo busy times");
        Ok(busy)
    }

    fn is_demo(&self) -> bool {
        true
    }
}
