//! Input configuration for a single generation call.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};

/// Upper bound on the number of dates one generation may offer.
pub const MAX_DATE_RANGE_DAYS: u32 = 30;

/// IANA name of the host's timezone, or `UTC` when it cannot be determined.
pub fn host_timezone() -> String {
    timezone_or_utc(iana_time_zone::get_timezone().ok())
}

/// `detected` if it names a known IANA zone, otherwise `UTC`.
pub fn timezone_or_utc(detected: Option<String>) -> String {
    match detected {
        Some(name) if name.parse::<Tz>().is_ok() => name,
        other => {
            tracing::debug!(detected = ?other, "host timezone unavailable, using UTC");
            "UTC".to_string()
        }
    }
}

/// Supported meeting lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum MeetingDuration {
    Fifteen,
    #[default]
    Thirty,
    FortyFive,
    Sixty,
}

impl MeetingDuration {
    pub const ALL: [MeetingDuration; 4] = [
        MeetingDuration::Fifteen,
        MeetingDuration::Thirty,
        MeetingDuration::FortyFive,
        MeetingDuration::Sixty,
    ];

    pub fn minutes(self) -> u32 {
        match self {
            MeetingDuration::Fifteen => 15,
            MeetingDuration::Thirty => 30,
            MeetingDuration::FortyFive => 45,
            MeetingDuration::Sixty => 60,
        }
    }
}

impl TryFrom<u32> for MeetingDuration {
    type Error = EngineError;

    fn try_from(minutes: u32) -> Result<Self> {
        match minutes {
            15 => Ok(MeetingDuration::Fifteen),
            30 => Ok(MeetingDuration::Thirty),
            45 => Ok(MeetingDuration::FortyFive),
            60 => Ok(MeetingDuration::Sixty),
            other => Err(EngineError::InvalidOptions(format!(
                "meeting duration must be 15, 30, 45, or 60 minutes (got {})",
                other
            ))),
        }
    }
}

impl From<MeetingDuration> for u32 {
    fn from(d: MeetingDuration) -> Self {
        d.minutes()
    }
}

/// Which weekend days may be offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekendPolicy {
    pub saturday: bool,
    pub sunday: bool,
}

/// Metadata copied into every rendering and booking link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingDetails {
    pub title: String,
    pub attendee_email: Option<String>,
    pub conference_link: Option<String>,
}

impl Default for MeetingDetails {
    fn default() -> Self {
        Self {
            title: "Meeting".to_string(),
            attendee_email: None,
            conference_link: None,
        }
    }
}

/// Options for one generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// First bookable hour (0-23, local time).
    pub business_hours_start: u32,
    /// Hour by which the last slot must end (0-24, local time).
    pub business_hours_end: u32,
    pub duration: MeetingDuration,
    /// Number of dates to offer after weekend filtering.
    pub days: u32,
    pub weekends: WeekendPolicy,
    /// IANA timezone identifier, e.g. `America/New_York`. Defaults to the
    /// host's zone.
    pub timezone: String,
    pub meeting: MeetingDetails,
    pub dst_policy: DstPolicy,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            business_hours_start: 9,
            business_hours_end: 17,
            duration: MeetingDuration::default(),
            days: 3,
            weekends: WeekendPolicy::default(),
            timezone: host_timezone(),
            meeting: MeetingDetails::default(),
            dst_policy: DstPolicy::default(),
        }
    }
}

impl GenerationOptions {
    /// Check hour bounds and day count, then parse the timezone.
    ///
    /// `business_hours_start >= business_hours_end` is accepted and produces
    /// an empty grid, as is `days == 0`.
    pub fn validate(&self) -> Result<Tz> {
        if self.days > MAX_DATE_RANGE_DAYS {
            return Err(EngineError::InvalidOptions(format!(
                "date range must be at most {} days (got {})",
                MAX_DATE_RANGE_DAYS, self.days
            )));
        }
        if self.business_hours_start > 23 {
            return Err(EngineError::InvalidOptions(format!(
                "business hours start must be between 0 and 23 (got {})",
                self.business_hours_start
            )));
        }
        if self.business_hours_end > 24 {
            return Err(EngineError::InvalidOptions(format!(
                "business hours end must be between 0 and 24 (got {})",
                self.business_hours_end
            )));
        }
        self.tz()
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| EngineError::InvalidTimezone(self.timezone.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_accepts_only_supported_minutes() {
        for d in MeetingDuration::ALL {
            assert_eq!(MeetingDuration::try_from(d.minutes()).unwrap(), d);
        }
        assert!(MeetingDuration::try_from(20).is_err());
        assert!(MeetingDuration::try_from(0).is_err());
    }

    #[test]
    fn duration_serializes_as_minutes() {
        let json = serde_json::to_string(&MeetingDuration::FortyFive).unwrap();
        assert_eq!(json, "45");
        let back: MeetingDuration = serde_json::from_str("15").unwrap();
        assert_eq!(back, MeetingDuration::Fifteen);
        assert!(serde_json::from_str::<MeetingDuration>("25").is_err());
    }

    #[test]
    fn defaults_validate() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.timezone, host_timezone());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn undetectable_host_zone_falls_back_to_utc() {
        assert_eq!(timezone_or_utc(None), "UTC");
        assert_eq!(timezone_or_utc(Some("Nowhere/Special".to_string())), "UTC");
        assert_eq!(timezone_or_utc(Some(String::new())), "UTC");
        assert_eq!(
            timezone_or_utc(Some("Europe/Berlin".to_string())),
            "Europe/Berlin"
        );
    }

    #[test]
    fn host_zone_is_always_a_known_zone() {
        assert!(host_timezone().parse::<Tz>().is_ok());
    }

    #[test]
    fn out_of_range_hours_fail_fast() {
        let opts = GenerationOptions {
            business_hours_start: 24,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(EngineError::InvalidOptions(_))));

        let opts = GenerationOptions {
            business_hours_end: 25,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(EngineError::InvalidOptions(_))));
    }

    #[test]
    fn day_count_is_bounded() {
        let opts = GenerationOptions {
            days: MAX_DATE_RANGE_DAYS,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());

        for days in [MAX_DATE_RANGE_DAYS + 1, u32::MAX] {
            let opts = GenerationOptions {
                days,
                ..Default::default()
            };
            assert!(matches!(opts.validate(), Err(EngineError::InvalidOptions(_))));
        }
    }

    #[test]
    fn inverted_hours_are_not_an_error() {
        let opts = GenerationOptions {
            business_hours_start: 17,
            business_hours_end: 9,
            ..Default::default()
        };
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let opts = GenerationOptions {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(EngineError::InvalidTimezone(_))));
    }
}
