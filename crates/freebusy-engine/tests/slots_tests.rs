//! Tests for slot enumeration and busy-interval conflict resolution.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use freebusy_engine::{
    enumerate_slots, is_slot_busy, BusyInterval, DstPolicy, MeetingDuration, TimeSlot,
};
use proptest::prelude::*;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
}

fn busy(sh: u32, sm: u32, eh: u32, em: u32) -> BusyInterval {
    BusyInterval {
        start: at(sh, sm),
        end: at(eh, em),
    }
}

fn utc_slots(
    start: u32,
    end: u32,
    duration: MeetingDuration,
    busy: &[BusyInterval],
) -> Vec<TimeSlot> {
    enumerate_slots(day(), start, end, duration, chrono_tz::UTC, DstPolicy::Skip, busy)
}

#[test]
fn nine_to_five_half_hours_all_free() {
    let slots = utc_slots(9, 17, MeetingDuration::Thirty, &[]);

    assert_eq!(slots.len(), 16);
    assert!(slots.iter().all(|s| s.available && s.reason.is_none()));
    assert_eq!(slots[0].time, "09:00");
    assert_eq!(slots[0].time_formatted, "9 AM");
    assert_eq!(slots[1].time_formatted, "9:30 AM");
    assert_eq!(slots[15].time, "16:30");
    assert_eq!(slots[15].end, at(17, 0));
}

#[test]
fn busy_interval_covering_one_slot() {
    // [10:00, 10:30) busy: only the 10:00 slot is affected.
    let slots = utc_slots(9, 17, MeetingDuration::Thirty, &[busy(10, 0, 10, 30)]);

    let by_time = |t: &str| slots.iter().find(|s| s.time == t).unwrap();
    assert!(!by_time("10:00").available);
    assert_eq!(by_time("10:00").reason.as_deref(), Some("busy"));
    assert!(by_time("09:30").available, "touching the busy start is not a conflict");
    assert!(by_time("10:30").available, "touching the busy end is not a conflict");
    assert_eq!(slots.iter().filter(|s| !s.available).count(), 1);
}

#[test]
fn busy_interval_spanning_two_slots() {
    let slots = utc_slots(9, 17, MeetingDuration::Thirty, &[busy(10, 0, 11, 0)]);

    let unavailable: Vec<&str> = slots
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.time.as_str())
        .collect();
    assert_eq!(unavailable, vec!["10:00", "10:30"]);
}

#[test]
fn partial_overlap_marks_slot_busy() {
    // 10:10-10:20 sits inside the 10:00 slot only.
    let slots = utc_slots(9, 17, MeetingDuration::Thirty, &[busy(10, 10, 10, 20)]);
    let unavailable: Vec<&str> = slots
        .iter()
        .filter(|s| !s.available)
        .map(|s| s.time.as_str())
        .collect();
    assert_eq!(unavailable, vec!["10:00"]);
}

#[test]
fn overlapping_busy_intervals_compound() {
    let slots = utc_slots(
        9,
        12,
        MeetingDuration::Sixty,
        &[busy(9, 30, 10, 15), busy(9, 45, 10, 30)],
    );
    let flags: Vec<bool> = slots.iter().map(|s| s.available).collect();
    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn equal_hours_produce_no_slots() {
    assert!(utc_slots(9, 9, MeetingDuration::Thirty, &[]).is_empty());
    assert!(utc_slots(17, 9, MeetingDuration::Thirty, &[]).is_empty());
}

#[test]
fn trailing_partial_slot_is_omitted() {
    // 9-17 is 480 minutes: 45-minute slots fit 10 times (450), the 11th would end at 17:15.
    let slots = utc_slots(9, 17, MeetingDuration::FortyFive, &[]);
    assert_eq!(slots.len(), 10);
    assert_eq!(slots[1].time, "09:45");
    assert_eq!(slots[2].time_formatted, "10:30 AM");
    assert_eq!(slots.last().unwrap().time, "15:45");
    assert_eq!(slots.last().unwrap().end, at(16, 30));
}

#[test]
fn end_hour_twenty_four_reaches_midnight() {
    let slots = utc_slots(22, 24, MeetingDuration::Sixty, &[]);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].time_formatted, "11 PM");
    assert_eq!(
        slots[1].end,
        Utc.with_ymd_and_hms(2026, 3, 17, 0, 0, 0).unwrap()
    );
}

#[test]
fn slots_are_local_to_the_timezone() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let slots = enumerate_slots(
        day(),
        9,
        10,
        MeetingDuration::Thirty,
        tz,
        DstPolicy::Skip,
        &[],
    );
    assert_eq!(slots.len(), 2);
    // EDT is UTC-4 on 2026-03-16.
    assert_eq!(slots[0].start, at(13, 0));
    assert_eq!(slots[0].time, "09:00");
}

#[test]
fn spring_forward_gap_follows_policy() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let gap_day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

    let skipped = enumerate_slots(
        gap_day,
        1,
        4,
        MeetingDuration::Sixty,
        tz,
        DstPolicy::Skip,
        &[],
    );
    let times: Vec<&str> = skipped.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["01:00", "03:00"]);

    // 02:00 shifts onto 03:00 EDT, which the 03:00 slot already covers.
    let shifted = enumerate_slots(
        gap_day,
        1,
        5,
        MeetingDuration::Sixty,
        tz,
        DstPolicy::ShiftForward,
        &[],
    );
    let times: Vec<&str> = shifted.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["01:00", "03:00", "04:00"]);
    let starts: Vec<DateTime<Utc>> = shifted.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![
            Utc.with_ymd_and_hms(2026, 3, 8, 6, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 8, 8, 0, 0).unwrap(),
        ]
    );
}

#[test]
fn shifted_slot_is_kept_when_nothing_else_starts_there() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let gap_day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

    let slots = enumerate_slots(
        gap_day,
        1,
        3,
        MeetingDuration::Sixty,
        tz,
        DstPolicy::ShiftForward,
        &[],
    );
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].time, "02:00");
    assert_eq!(slots[1].start, Utc.with_ymd_and_hms(2026, 3, 8, 7, 0, 0).unwrap());
}

#[test]
fn half_hour_slots_in_the_gap_do_not_duplicate() {
    let tz: Tz = "America/New_York".parse().unwrap();
    let gap_day = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();

    let slots = enumerate_slots(
        gap_day,
        1,
        4,
        MeetingDuration::Thirty,
        tz,
        DstPolicy::ShiftForward,
        &[],
    );
    let times: Vec<&str> = slots.iter().map(|s| s.time.as_str()).collect();
    assert_eq!(times, vec!["01:00", "01:30", "03:00", "03:30"]);

    let mut starts: Vec<DateTime<Utc>> = slots.iter().map(|s| s.start).collect();
    starts.dedup();
    assert_eq!(starts.len(), slots.len());
}

#[test]
fn is_slot_busy_uses_strict_bounds() {
    let b = [busy(10, 0, 11, 0)];
    assert!(!is_slot_busy(at(9, 0), at(10, 0), &b));
    assert!(!is_slot_busy(at(11, 0), at(12, 0), &b));
    assert!(is_slot_busy(at(9, 30), at(10, 30), &b));
    assert!(is_slot_busy(at(10, 15), at(10, 45), &b));
    assert!(is_slot_busy(at(9, 0), at(12, 0), &b));
    assert!(!is_slot_busy(at(9, 0), at(10, 0), &[]));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn arb_duration() -> impl Strategy<Value = MeetingDuration> {
    prop::sample::select(MeetingDuration::ALL.to_vec())
}

fn arb_busy() -> impl Strategy<Value = Vec<BusyInterval>> {
    prop::collection::vec((0u32..24 * 60, 1u32..=180), 0..6).prop_map(|items| {
        items
            .into_iter()
            .map(|(start, len)| {
                let start = at(0, 0) + chrono::Duration::minutes(i64::from(start));
                BusyInterval {
                    start,
                    end: start + chrono::Duration::minutes(i64::from(len)),
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn slot_count_is_floor_of_window(
        start in 0u32..=23,
        end in 0u32..=24,
        duration in arb_duration(),
    ) {
        let slots = utc_slots(start, end, duration, &[]);
        let expected = if start < end {
            ((end - start) * 60 / duration.minutes()) as usize
        } else {
            0
        };
        prop_assert_eq!(slots.len(), expected);
        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
            prop_assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn unavailable_iff_strict_overlap(
        duration in arb_duration(),
        busy in arb_busy(),
    ) {
        let slots = utc_slots(8, 18, duration, &busy);
        for slot in &slots {
            let overlaps = busy.iter().any(|b| slot.start < b.end && slot.end > b.start);
            prop_assert_eq!(slot.available, !overlaps);
            prop_assert_eq!(slot.reason.is_some(), overlaps);
        }
    }
}
