//! Slot enumeration and conflict resolution.
//!
//! Each business day is cut into fixed-size slots starting exactly at the
//! configured start hour. A slot is busy when it overlaps any busy interval.
//! Adjacent intervals (where one ends exactly when the other starts) are NOT
//! conflicts.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::daterange::DateRange;
use crate::dst::{is_nonexistent, resolve_local, DstPolicy};
use crate::format::{format_date, format_time, format_time_for_display};
use crate::options::{GenerationOptions, MeetingDuration};

/// A half-open `[start, end)` interval during which the calendar owner is busy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// A candidate meeting window within business hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// 24-hour local label, e.g. `09:30`.
    pub time: String,
    /// Display label, e.g. `9:30 AM`.
    pub time_formatted: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
    pub reason: Option<String>,
}

/// One date and its slots, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    /// Display label, e.g. `Mon Mar 16`.
    pub date_formatted: String,
    pub slots: Vec<TimeSlot>,
}

impl DayAvailability {
    pub fn available_slots(&self) -> impl Iterator<Item = &TimeSlot> {
        self.slots.iter().filter(|s| s.available)
    }

    pub fn slot_at(&self, time_formatted: &str) -> Option<&TimeSlot> {
        self.slots.iter().find(|s| s.time_formatted == time_formatted)
    }
}

/// True if `[start, end)` overlaps any busy interval.
///
/// Overlap is `start < busy.end && end > busy.start`, so touching a boundary
/// does not count.
pub fn is_slot_busy(start: DateTime<Utc>, end: DateTime<Utc>, busy: &[BusyInterval]) -> bool {
    busy.iter().any(|b| start < b.end && end > b.start)
}

/// Generate the slots for one date.
///
/// Slots step by `duration` from `start_hour:00` local time; a slot is only
/// emitted if it ends at or before `end_hour:00`. `start_hour >= end_hour`
/// yields no slots.
///
/// Under [`DstPolicy::ShiftForward`] a slot shifted out of a DST gap is
/// dropped when it lands on the start of a regular slot of the same day.
pub fn enumerate_slots(
    date: NaiveDate,
    start_hour: u32,
    end_hour: u32,
    duration: MeetingDuration,
    tz: Tz,
    dst_policy: DstPolicy,
    busy: &[BusyInterval],
) -> Vec<TimeSlot> {
    let step = duration.minutes();
    let window_end = end_hour * 60;
    let mut minute = start_hour * 60;
    let mut slots = Vec::new();
    let mut shifted = Vec::new();

    while minute + step <= window_end {
        let (hour, min) = (minute / 60, minute % 60);
        minute += step;

        let Some(local) = date.and_hms_opt(hour, min, 0) else {
            continue;
        };
        let Some(start) = resolve_local(tz, local, dst_policy) else {
            continue;
        };
        shifted.push(is_nonexistent(tz, local));
        let end = start + Duration::minutes(i64::from(step));
        let available = !is_slot_busy(start, end, busy);

        slots.push(TimeSlot {
            time: format_time(hour, min),
            time_formatted: format_time_for_display(hour, min),
            start,
            end,
            available,
            reason: (!available).then(|| "busy".to_string()),
        });
    }

    let regular: Vec<DateTime<Utc>> = slots
        .iter()
        .zip(&shifted)
        .filter(|(_, moved)| !**moved)
        .map(|(slot, _)| slot.start)
        .collect();
    slots
        .into_iter()
        .zip(shifted)
        .filter(|(slot, moved)| !*moved || !regular.contains(&slot.start))
        .map(|(slot, _)| slot)
        .collect()
}

/// Enumerate every date in `range` against the same busy set.
pub fn enumerate_days(
    range: &DateRange,
    options: &GenerationOptions,
    tz: Tz,
    busy: &[BusyInterval],
) -> Vec<DayAvailability> {
    range
        .dates
        .iter()
        .map(|&date| DayAvailability {
            date,
            date_formatted: format_date(date),
            slots: enumerate_slots(
                date,
                options.business_hours_start,
                options.business_hours_end,
                options.duration,
                tz,
                options.dst_policy,
                busy,
            ),
        })
        .collect()
}
