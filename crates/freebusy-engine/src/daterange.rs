//! Build the list of calendar dates to offer.
//!
//! Dates start the day after "today" so already-elapsed slots are never
//! proposed, and walk forward one day at a time, skipping weekend days the
//! policy excludes.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::options::{WeekendPolicy, MAX_DATE_RANGE_DAYS};

/// Ordered, strictly increasing calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub dates: Vec<NaiveDate>,
}

impl DateRange {
    pub fn start(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Absolute `[start, end)` window covering every date in `tz`: local
    /// midnight of the first date up to local midnight after the last.
    pub fn query_window(&self, tz: Tz) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.start()?;
        let after_last = self.end()?.checked_add_days(Days::new(1))?;
        Some((local_midnight(tz, first)?, local_midnight(tz, after_last)?))
    }
}

fn local_midnight(tz: Tz, date: NaiveDate) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    // A few zones skip midnight on DST days; fall back to 01:00.
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&date.and_hms_opt(1, 0, 0)?).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Whether `date` may be offered under `weekends`.
pub fn is_included(date: NaiveDate, weekends: WeekendPolicy) -> bool {
    match date.weekday() {
        Weekday::Sat => weekends.saturday,
        Weekday::Sun => weekends.sunday,
        _ => true,
    }
}

/// Collect exactly `days` dates starting the day after `today`.
///
/// `days == 0` produces an empty range. Callers bound `days` (see
/// [`MAX_DATE_RANGE_DAYS`]); the builder only caps its up-front allocation.
pub fn build_date_range(today: NaiveDate, days: u32, weekends: WeekendPolicy) -> DateRange {
    let mut dates = Vec::with_capacity(days.min(MAX_DATE_RANGE_DAYS) as usize);
    let mut current = today.succ_opt();

    while dates.len() < days as usize {
        let Some(date) = current else { break };
        if is_included(date, weekends) {
            dates.push(date);
        }
        current = date.succ_opt();
    }

    DateRange { dates }
}
