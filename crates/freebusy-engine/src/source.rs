//! Collaborators consumed by the generation pipeline.
//!
//! - [`ClientProvider`] hands out an authenticated client, or fails with
//!   [`EngineError::NotAuthenticated`].
//! - [`BusyTimeSource`] answers one free/busy query for an absolute window.
//!
//! Demo mode is just another `BusyTimeSource` (see [`crate::demo`]).

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{EngineError, Result};
use crate::slots::BusyInterval;

/// Opaque handle to an authenticated calendar session.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedClient {
    access_token: String,
}

impl AuthenticatedClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for AuthenticatedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedClient")
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Supplies an authenticated client for the calendar provider.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn client(&self) -> Result<AuthenticatedClient>;
}

/// Reports busy intervals for a calendar owner.
#[async_trait]
pub trait BusyTimeSource: Send + Sync {
    /// Busy intervals overlapping `[start, end)`. `timezone` is the IANA zone
    /// the caller is working in.
    async fn query_busy(
        &self,
        client: &AuthenticatedClient,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        timezone: &str,
    ) -> Result<Vec<BusyInterval>>;

    /// True when the intervals are synthetic.
    fn is_demo(&self) -> bool {
        false
    }
}

/// Provider backed by a token obtained elsewhere (environment, keychain).
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Read the token from an environment variable.
    pub fn from_env(var: &str) -> Self {
        Self::new(std::env::var(var).ok())
    }
}

#[async_trait]
impl ClientProvider for StaticTokenProvider {
    async fn client(&self) -> Result<AuthenticatedClient> {
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(AuthenticatedClient::new(token)),
            _ => Err(EngineError::NotAuthenticated(
                "no access token available".to_string(),
            )),
        }
    }
}

/// Always-authenticated provider for demo mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoClientProvider;

#[async_trait]
impl ClientProvider for DemoClientProvider {
    async fn client(&self) -> Result<AuthenticatedClient> {
        Ok(AuthenticatedClient::new("demo"))
    }
}

/// Fixed set of intervals, filtered to those overlapping the queried window.
#[derive(Debug, Clone, Default)]
pub struct StaticBusySource {
    busy: Vec<BusyInterval>,
}

impl StaticBusySource {
    pub fn new(busy: Vec<BusyInterval>) -> Self {
        Self { busy }
    }
}

#[async_trait]
impl BusyTimeSource for StaticBusySource {
    async fn query_busy(
        &self,
        _client: &AuthenticatedClient,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        _timezone: &str,
    ) -> Result<Vec<BusyInterval>> {
        Ok(self
            .busy
            .iter()
            .filter(|b| b.start < end && b.end > start)
            .cloned()
            .collect())
    }
}
