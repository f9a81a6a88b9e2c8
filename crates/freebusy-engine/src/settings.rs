//! Persistent user settings.
//!
//! Settings are stored as TOML (or JSON for import/export). Every field has a
//! default, so partial files load cleanly. [`Settings::validate`] is applied
//! on every load.
//!
//! ```toml
//! [personal]
//! email = "me@example.com"
//! meeting_title = "Intro call"
//! zoom_link = "https://zoom.us/j/123"
//!
//! [schedule]
//! business_hours_start = 9
//! business_hours_end = 17
//! meeting_duration_minutes = 30
//! default_date_range_days = 3
//! timezone = "America/New_York"
//!
//! [schedule.include_weekends]
//! saturday = false
//! sunday = false
//! ```

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::dst::DstPolicy;
use crate::error::{EngineError, Result};
use crate::options::{
    host_timezone, GenerationOptions, MeetingDetails, MeetingDuration, WeekendPolicy,
    MAX_DATE_RANGE_DAYS,
};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub personal: PersonalSettings,
    pub schedule: ScheduleSettings,
    pub behavior: BehaviorSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalSettings {
    /// Attendee added to booking links. Empty means none.
    pub email: String,
    pub meeting_title: String,
    /// Conferencing link placed in event details. Empty means none.
    pub zoom_link: String,
}

impl Default for PersonalSettings {
    fn default() -> Self {
        Self {
            email: String::new(),
            meeting_title: "Meeting".to_string(),
            zoom_link: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    pub business_hours_start: u32,
    pub business_hours_end: u32,
    pub meeting_duration_minutes: u32,
    pub default_date_range_days: u32,
    pub include_weekends: WeekendPolicy,
    pub timezone: String,
    pub dst_policy: DstPolicy,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self {
            business_hours_start: 9,
            business_hours_end: 17,
            meeting_duration_minutes: 30,
            default_date_range_days: 3,
            include_weekends: WeekendPolicy::default(),
            timezone: host_timezone(),
            dst_policy: DstPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    /// Deadline for one whole generation, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
        }
    }
}

impl Settings {
    /// Load from `path`, choosing the format by extension (`.toml` or `.json`).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Settings(format!("cannot read {}: {}", path.display(), e))
        })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            other => Err(EngineError::Settings(format!(
                "unsupported settings format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: Settings =
            toml::from_str(text).map_err(|e| EngineError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Import settings previously produced by [`Settings::to_json_pretty`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let settings: Settings =
            serde_json::from_str(text).map_err(|e| EngineError::Settings(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Settings(e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| EngineError::Settings(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let personal = &self.personal;
        if !personal.email.is_empty() && !EMAIL_RE.is_match(&personal.email) {
            return Err(invalid("Invalid email address"));
        }
        if !personal.zoom_link.is_empty() && Url::parse(&personal.zoom_link).is_err() {
            return Err(invalid("Invalid Zoom link URL"));
        }

        let schedule = &self.schedule;
        if schedule.business_hours_start >= schedule.business_hours_end {
            return Err(invalid("Business hours start must be before end time"));
        }
        if schedule.business_hours_start > 23 {
            return Err(invalid("Business hours start must be between 0 and 23"));
        }
        if !(1..=24).contains(&schedule.business_hours_end) {
            return Err(invalid("Business hours end must be between 1 and 24"));
        }
        MeetingDuration::try_from(schedule.meeting_duration_minutes)
            .map_err(|_| invalid("Meeting duration must be 15, 30, 45, or 60 minutes"))?;
        if !(1..=MAX_DATE_RANGE_DAYS).contains(&schedule.default_date_range_days) {
            return Err(invalid("Date range must be between 1 and 30 days"));
        }
        if schedule.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(EngineError::InvalidTimezone(schedule.timezone.clone()));
        }

        if self.behavior.request_timeout_secs == 0 {
            return Err(invalid("Request timeout must be at least one second"));
        }

        Ok(())
    }

    /// Options for a generation using these settings.
    pub fn generation_options(&self) -> Result<GenerationOptions> {
        let schedule = &self.schedule;
        let personal = &self.personal;
        Ok(GenerationOptions {
            business_hours_start: schedule.business_hours_start,
            business_hours_end: schedule.business_hours_end,
            duration: MeetingDuration::try_from(schedule.meeting_duration_minutes)?,
            days: schedule.default_date_range_days,
            weekends: schedule.include_weekends,
            timezone: schedule.timezone.clone(),
            meeting: MeetingDetails {
                title: personal.meeting_title.clone(),
                attendee_email: non_empty(&personal.email),
                conference_link: non_empty(&personal.zoom_link),
            },
            dst_policy: schedule.dst_policy,
        })
    }
}

fn invalid(message: &str) -> EngineError {
    EngineError::Settings(message.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
