//! Per-character cooldown tracking.
//!
//! Every action response carries the absolute time at which the character may
//! act again. The gate stores the latest one and parks the caller until it
//! has passed. Cooldown tracking is best-effort: an unparseable timestamp is
//! logged and treated as "no known cooldown".

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

/// Timestamp format used by the API for cooldown expirations
pub const COOLDOWN_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

#[derive(Debug, Clone, Default)]
pub struct CooldownGate {
    expires_at: Option<DateTime<Utc>>,
}

impl CooldownGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    pub fn is_known(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Store the expiration carried by a response.
    ///
    /// `None` leaves the current state untouched. A present value always
    /// overwrites, even when it is earlier than the stored one.
    pub fn record(&mut self, expiration: Option<&str>) {
        let Some(raw) = expiration else {
            return;
        };

        match parse_expiration(raw) {
            Some(expires_at) => {
                debug!(%expires_at, "Cooldown recorded");
                self.expires_at = Some(expires_at);
            }
            None => {
                warn!(value = %raw, "Unparseable cooldown expiration, ignoring cooldown");
                self.expires_at = None;
            }
        }
    }

    /// Time left until the gate opens, or `None` when no wait is needed
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        let expires_at = self.expires_at?;
        (expires_at - now).to_std().ok().filter(|d| !d.is_zero())
    }

    /// Park until the stored expiration has passed.
    pub async fn await_ready(&self) {
        while let Some(wait) = self.remaining(Utc::now()) {
            debug!(wait_ms = wait.as_millis() as u64, "Waiting for cooldown");
            tokio::time::sleep(wait).await;
        }
    }
}

fn parse_expiration(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, COOLDOWN_FORMAT)
        .map(|naive| naive.and_utc())
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        })
}

/// Format a timestamp the way the API does
pub fn format_expiration(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
