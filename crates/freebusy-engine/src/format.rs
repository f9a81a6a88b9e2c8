//! Render an availability grid as plain text, Markdown and HTML.
//!
//! All three renderings read the same `DayAvailability` sequence, so they
//! always agree on which slots are bookable. Tabular formats have one row per
//! distinct time label, ordered by minute of day rather than by string.

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::options::GenerationOptions;
use crate::slots::{DayAvailability, TimeSlot};

/// Google Calendar "create event" endpoint.
pub const CALENDAR_RENDER_URL: &str = "https://calendar.google.com/calendar/render";

const DEMO_NOTICE: &str = "This is demo data for testing purposes";
const UNAVAILABLE: &str = "—";
const LINK_STYLE: &str = "color: #007AFF; text-decoration: none; font-weight: bold;";

/// The three shareable renderings of one generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFormats {
    pub plain: String,
    pub markdown: String,
    pub html: String,
}

/// `HH:MM`, zero padded.
pub fn format_time(hour: u32, minute: u32) -> String {
    format!("{:02}:{:02}", hour, minute)
}

/// 12-hour display label: `9 AM`, `9:30 AM`, `12 PM`, `12 AM`.
pub fn format_time_for_display(hour: u32, minute: u32) -> String {
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    if minute == 0 {
        format!("{} {}", display_hour, period)
    } else {
        format!("{}:{:02} {}", display_hour, minute, period)
    }
}

/// `Mon Mar 16`.
pub fn format_date(date: NaiveDate) -> String {
    let day = match date.weekday() {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    };
    format!("{} {}", day, date.format("%b %-d"))
}

/// Minute of day for a display label produced by [`format_time_for_display`].
///
/// Returns `None` for anything that is not `H[:MM] AM|PM`.
pub fn parse_time_label(label: &str) -> Option<u32> {
    let (time, period) = label.trim().split_once(' ')?;
    let (hour, minute) = match time.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (time.parse::<u32>().ok()?, 0),
    };
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }
    let hour24 = match (period, hour) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        _ => return None,
    };
    Some(hour24 * 60 + minute)
}

/// Union of display labels across all days, in chronological order.
pub fn time_rows(days: &[DayAvailability]) -> Vec<String> {
    let mut labels: Vec<(u32, &str)> = days
        .iter()
        .flat_map(|d| d.slots.iter())
        .map(|s| {
            let key = parse_time_label(&s.time_formatted).unwrap_or(u32::MAX);
            (key, s.time_formatted.as_str())
        })
        .collect();
    labels.sort_unstable();
    labels.dedup();
    labels.into_iter().map(|(_, l)| l.to_string()).collect()
}

/// Renders a grid using the meeting metadata and timezone of one generation.
#[derive(Debug, Clone, Copy)]
pub struct Formatter<'a> {
    options: &'a GenerationOptions,
    tz: Tz,
    demo: bool,
}

impl<'a> Formatter<'a> {
    pub fn new(options: &'a GenerationOptions, tz: Tz) -> Self {
        Self {
            options,
            tz,
            demo: false,
        }
    }

    /// Mark the output as synthetic data.
    pub fn demo(mut self, demo: bool) -> Self {
        self.demo = demo;
        self
    }

    pub fn render_all(&self, days: &[DayAvailability]) -> RenderedFormats {
        RenderedFormats {
            plain: self.plain(days),
            markdown: self.markdown(days),
            html: self.html(days),
        }
    }

    /// Booking deep link for `slot`.
    ///
    /// Start and end are local wall-clock times in the generation timezone,
    /// `YYYYMMDDTHHMMSS` with no zone suffix.
    pub fn calendar_link(&self, slot: &TimeSlot) -> String {
        let fmt = "%Y%m%dT%H%M%S";
        let start = slot.start.with_timezone(&self.tz).format(fmt);
        let end = slot.end.with_timezone(&self.tz).format(fmt);
        let meeting = &self.options.meeting;
        let details = meeting
            .conference_link
            .as_deref()
            .map(|link| format!("Zoom: {}", link))
            .unwrap_or_default();

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &meeting.title)
            .append_pair("dates", &format!("{}/{}", start, end))
            .append_pair("details", &details)
            .append_pair("add", meeting.attendee_email.as_deref().unwrap_or(""))
            .finish();

        format!("{}?{}", CALENDAR_RENDER_URL, query)
    }

    pub fn plain(&self, days: &[DayAvailability]) -> String {
        let meeting = &self.options.meeting;
        let mut out = String::new();

        out.push_str(self.heading());
        out.push_str("\n\n");
        out.push_str(&format!("Meeting: {}\n", meeting.title));
        if let Some(link) = &meeting.conference_link {
            out.push_str(&format!("Zoom: {}\n", link));
        }
        if let Some(email) = &meeting.attendee_email {
            out.push_str(&format!("Attendee: {}\n", email));
        }
        out.push('\n');
        if self.demo {
            out.push_str(&format!("{}\n\n", DEMO_NOTICE));
        }

        for day in days {
            out.push_str(&format!("{}:\n", day.date_formatted));
            for slot in day.available_slots() {
                out.push_str(&format!("  {} - AVAILABLE\n", slot.time_formatted));
            }
            out.push('\n');
        }

        out
    }

    pub fn markdown(&self, days: &[DayAvailability]) -> String {
        let meeting = &self.options.meeting;
        let mut out = String::new();

        out.push_str(&format!("# {}\n\n", self.heading()));
        out.push_str(&format!("**Meeting:** {}  \n", meeting.title));
        if let Some(link) = &meeting.conference_link {
            out.push_str(&format!("**Zoom:** {}  \n", link));
        }
        if let Some(email) = &meeting.attendee_email {
            out.push_str(&format!("**Attendee:** {}  \n", email));
        }
        out.push('\n');
        if self.demo {
            out.push_str(&format!("_{}_\n\n", DEMO_NOTICE));
        }

        out.push_str("| Time |");
        for day in days {
            out.push_str(&format!(" {} |", day.date_formatted));
        }
        out.push('\n');
        out.push_str("|------|");
        for _ in days {
            out.push_str("----------|");
        }
        out.push('\n');

        for time in time_rows(days) {
            out.push_str(&format!("| **{}** |", time));
            for day in days {
                match day.slot_at(&time).filter(|s| s.available) {
                    Some(slot) => {
                        out.push_str(&format!(" [book]({}) |", self.calendar_link(slot)));
                    }
                    None => {
                        out.push_str(&format!(" {} |", UNAVAILABLE));
                    }
                }
            }
            out.push('\n');
        }

        out
    }

    pub fn html(&self, days: &[DayAvailability]) -> String {
        let meeting = &self.options.meeting;
        let mut out = String::new();

        if self.demo {
            out.push_str("<div class=\"freebusy-availability demo-mode\">\n");
            out.push_str(&format!("  <div class=\"demo-notice\">{}</div>\n", DEMO_NOTICE));
        } else {
            out.push_str("<div class=\"freebusy-availability\">\n");
        }
        out.push_str("  <div class=\"meeting-details\">\n");
        out.push_str("    <h3>Meeting Availability</h3>\n");
        out.push_str(&format!(
            "    <p><strong>Meeting:</strong> {}</p>\n",
            html_escape::encode_text(&meeting.title)
        ));
        if let Some(link) = &meeting.conference_link {
            out.push_str(&format!(
                "    <p><strong>Zoom:</strong> <a href=\"{}\">Join Meeting</a></p>\n",
                html_escape::encode_double_quoted_attribute(link)
            ));
        }
        if let Some(email) = &meeting.attendee_email {
            out.push_str(&format!(
                "    <p><strong>Attendee:</strong> {}</p>\n",
                html_escape::encode_text(email)
            ));
        }
        out.push_str("  </div>\n\n");

        out.push_str("  <table class=\"availability-table\">\n");
        out.push_str("    <thead>\n      <tr>\n        <th>Time</th>\n");
        for day in days {
            out.push_str(&format!(
                "        <th><strong>{}</strong></th>\n",
                day.date_formatted
            ));
        }
        out.push_str("      </tr>\n    </thead>\n    <tbody>\n");

        for time in time_rows(days) {
            out.push_str(&format!(
                "      <tr>\n        <td><strong>{}</strong></td>\n",
                time
            ));
            for day in days {
                match day.slot_at(&time).filter(|s| s.available) {
                    Some(slot) => {
                        let link = self.calendar_link(slot);
                        out.push_str(&format!(
                            "        <td><a href=\"{}\" style=\"{}\">book</a></td>\n",
                            html_escape::encode_double_quoted_attribute(&link),
                            LINK_STYLE
                        ));
                    }
                    None => {
                        out.push_str(&format!(
                            "        <td><span class=\"unavailable\">{}</span></td>\n",
                            UNAVAILABLE
                        ));
                    }
                }
            }
            out.push_str("      </tr>\n");
        }

        out.push_str("    </tbody>\n  </table>\n</div>");
        out
    }

    fn heading(&self) -> &'static str {
        if self.demo {
            "Meeting Availability - DEMO DATA"
        } else {
            "Meeting Availability"
        }
    }
}
