//! # freebusy-engine
//!
//! Turns calendar free/busy data into shareable meeting availability.
//!
//! Given business hours, a meeting length and a number of days, the engine
//! picks the upcoming dates, fetches busy intervals once for the whole range,
//! marks each fixed-size slot as available or busy, and renders the grid as
//! plain text, Markdown and HTML with per-slot "add event" links.
//!
//! ## Modules
//!
//! - [`daterange`] — upcoming dates under a weekend policy
//! - [`slots`] — slot enumeration and busy-interval overlap
//! - [`format`] — plain text / Markdown / HTML rendering and booking links
//! - [`generator`] — the async pipeline producing an [`AvailabilityResult`]
//! - [`source`] — client provider and busy-time source traits
//! - [`google`] — Google Calendar FreeBusy source
//! - [`demo`] — synthetic busy times
//! - [`settings`] — validated, file-backed user settings
//! - [`dst`] — DST gap policies
//! - [`error`] — Error types

pub mod daterange;
pub mod demo;
pub mod dst;
pub mod error;
pub mod format;
pub mod generator;
pub mod google;
pub mod options;
pub mod settings;
pub mod slots;
pub mod source;

pub use daterange::{build_date_range, DateRange};
pub use demo::DemoBusySource;
pub use dst::DstPolicy;
pub use error::EngineError;
pub use format::{Formatter, RenderedFormats};
pub use generator::{AvailabilityGenerator, AvailabilityResult, BusinessHours};
pub use google::GoogleFreeBusySource;
pub use options::{
    host_timezone, GenerationOptions, MeetingDetails, MeetingDuration, WeekendPolicy, MAX_DATE_RANGE_DAYS,
};
pub use settings::Settings;
pub use slots::{enumerate_slots, is_slot_busy, BusyInterval, DayAvailability, TimeSlot};
pub use source::{
    AuthenticatedClient, BusyTimeSource, ClientProvider, DemoClientProvider, StaticBusySource,
    StaticTokenProvider,
};
