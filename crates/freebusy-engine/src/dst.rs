//! DST transition policies for slot start times.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Policy for slots whose local start time falls in a DST gap
/// (e.g., 2:30 AM during spring forward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Drop slots that fall in the DST gap
    Skip,
    /// Move the slot one hour later so it lands on a valid local time
    #[default]
    ShiftForward,
}

/// True when `local` falls in a spring-forward gap in `tz`.
pub fn is_nonexistent(tz: Tz, local: NaiveDateTime) -> bool {
    tz.from_local_datetime(&local).earliest().is_none()
}

/// Resolve a local wall-clock time in `tz` to an absolute instant.
///
/// Ambiguous times (fall back) resolve to the earlier instant. Nonexistent
/// times (spring forward) follow `policy`; `None` means the slot is dropped.
pub fn resolve_local(tz: Tz, local: NaiveDateTime, policy: DstPolicy) -> Option<DateTime<Utc>> {
    if let Some(dt) = tz.from_local_datetime(&local).earliest() {
        return Some(dt.with_timezone(&Utc));
    }

    match policy {
        DstPolicy::Skip => None,
        DstPolicy::ShiftForward => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn regular_time_resolves_directly() {
        let tz: Tz = "America/New_York".parse().unwrap();
        let dt = resolve_local(tz, local(2026, 3, 16, 9, 0), DstPolicy::Skip).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 3, 16, 13, 0, 0).unwrap());
    }

    #[test]
    fn gap_is_skipped_or_shifted() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // 2026-03-08 02:30 does not exist in New York.
        let gap = local(2026, 3, 8, 2, 30);
        assert_eq!(resolve_local(tz, gap, DstPolicy::Skip), None);

        let shifted = resolve_local(tz, gap, DstPolicy::ShiftForward).unwrap();
        assert_eq!(shifted, Utc.with_ymd_and_hms(2026, 3, 8, 7, 30, 0).unwrap());
    }

    #[test]
    fn ambiguous_time_takes_earliest() {
        let tz: Tz = "America/New_York".parse().unwrap();
        // 01:30 happens twice on 2026-11-01; the first is still EDT (UTC-4).
        let dt = resolve_local(tz, local(2026, 11, 1, 1, 30), DstPolicy::Skip).unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 11, 1, 5, 30, 0).unwrap());
    }
}
