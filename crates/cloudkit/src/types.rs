//! Shared types for control-plane clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Certificate material held by the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    /// Stable certificate identifier.
    pub certificate_id: String,
    /// PEM-encoded certificate body.
    pub certificate_pem: String,
    /// Current lifecycle status.
    pub status: CertificateStatus,
}

/// Lifecycle status of a device certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CertificateStatus {
    /// Certificate accepted for device authentication.
    Active,
    /// Certificate rejected for device authentication.
    Inactive,
}

impl CertificateStatus {
    /// Wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

/// One object in a bucket listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
}

/// One page of a bucket listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObjectPage {
    /// Objects in this page.
    pub objects: Vec<ObjectSummary>,
    /// Continuation token for the next page, if any.
    pub next_token: Option<String>,
    /// Whether further pages remain.
    pub truncated: bool,
}

/// A time-limited, unauthenticated read capability for one object.
///
/// The URL grants read access until `expires_at`; treat it as a bearer
/// secret and log it at debug level at most.
#[derive(Debug, Clone)]
pub struct PresignedUrl {
    /// Object key the URL reads.
    pub key: String,
    /// The capability URL itself.
    pub url: String,
    /// Instant the store stops honoring the URL.
    pub expires_at: DateTime<Utc>,
}

/// Polling configuration for job-deletion confirmation.
///
/// The queue is polled with exponential backoff until it reports the job
/// absent, for at most `max_attempts` queries.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum number of confirmation queries.
    pub max_attempts: u32,
    /// Delay before the first re-query.
    pub base_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_factor: f64,
    /// Maximum delay between queries.
    pub max_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            base_delay: Duration::from_secs(2),
            backoff_factor: 1.5,
            max_delay: Duration::from_secs(15),
        }
    }
}

impl PollConfig {
    /// Create a poll config with custom settings.
    pub fn new(max_attempts: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            base_delay,
            backoff_factor,
            max_delay: Duration::from_secs(15),
        }
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = delay.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }
}

/// Result of reaping a batch of jobs.
///
/// One failed reap never prevents the remaining ids from being attempted;
/// failures are collected here instead.
#[derive(Debug, Clone, Default)]
pub struct ReapReport {
    /// Job ids confirmed gone (or already absent).
    pub reaped: Vec<String>,
    /// Job ids that could not be reaped, with the failure message.
    pub failed: Vec<(String, String)>,
}

impl ReapReport {
    /// Whether every job was reaped.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total number of jobs attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.reaped.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_config_delay_backoff() {
        let config = PollConfig::new(5, Duration::from_secs(2), 2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(8));
    }

    #[test]
    fn test_poll_config_delay_capped() {
        let config = PollConfig::new(10, Duration::from_secs(2), 2.0);

        // 2 * 2^9 = 1024s, far over the 15s cap
        assert_eq!(config.delay_for_attempt(9), Duration::from_secs(15));
    }

    #[test]
    fn test_certificate_status_wire_names() {
        assert_eq!(CertificateStatus::Active.as_str(), "ACTIVE");
        assert_eq!(CertificateStatus::Inactive.as_str(), "INACTIVE");
    }

    #[test]
    fn test_certificate_status_serde_uppercase() {
        let json = serde_json::to_string(&CertificateStatus::Inactive).unwrap();
        assert_eq!(json, "\"INACTIVE\"");
    }

    #[test]
    fn test_reap_report_success() {
        let mut report = ReapReport::default();
        assert!(report.is_success());

        report.reaped.push("job-a".to_string());
        assert!(report.is_success());
        assert_eq!(report.total(), 1);

        report.failed.push(("job-b".to_string(), "timeout".to_string()));
        assert!(!report.is_success());
        assert_eq!(report.total(), 2);
    }
}
