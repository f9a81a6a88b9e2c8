//! Error types for availability generation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// No usable credentials. Callers should prompt for re-authentication.
    #[error("Not authenticated: {0}")]
    NotAuthenticated(String),

    /// The busy-time source answered with an error.
    #[error("Calendar query failed: {0}")]
    Provider(String),

    /// Transport-level failure talking to the calendar provider.
    #[error("Calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid settings: {0}")]
    Settings(String),
}

impl EngineError {
    /// True when the failure should send the user back through sign-in.
    pub fn is_auth(&self) -> bool {
        matches!(self, EngineError::NotAuthenticated(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
