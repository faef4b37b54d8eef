//! Data types for the publish flow.

use std::path::PathBuf;
use std::time::Duration;

use extpub_account_api::{BinaryReviewResult, ChangelogEntry, ReviewState};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// One release of an extension, as described in the publisher config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Release {
    pub extension_id: i32,
    pub version: String,
    /// Platform compatibility, e.g. `">=6.4.0.0, <6.6.0.0"`.
    pub constraint: String,
    /// Path to the built extension archive.
    pub artifact: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
    #[serde(default)]
    pub changelogs: Vec<ChangelogEntry>,
    #[serde(default)]
    pub ion_cube_encrypted: bool,
    #[serde(default)]
    pub license_check_required: bool,
}

/// Review polling schedule.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first fetch and between fetches.
    pub interval: Duration,
    /// Fetches before giving up; 0 polls until cancelled.
    pub max_attempts: u32,
    /// Multiplier applied to the delay after each fetch.
    pub backoff_factor: f64,
    /// Upper bound for the delay.
    pub max_interval: Duration,
    /// Spread delays by ±25%.
    pub jitter: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_attempts: 90,
            backoff_factor: 1.0,
            max_interval: Duration::from_secs(60),
            jitter: false,
        }
    }
}

impl PollConfig {
    /// Delay before the given attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(63) as i32;
        let secs = self.interval.as_secs_f64() * self.backoff_factor.max(1.0).powi(exp);
        let capped = secs.min(self.max_interval.as_secs_f64().max(self.interval.as_secs_f64()));
        if !self.jitter {
            return Duration::from_secs_f64(capped);
        }
        let offset = (std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .subsec_nanos() as f64
            / u32::MAX as f64)
            * 2.0
            - 1.0; // [-1.0, 1.0)
        Duration::from_secs_f64((capped + capped * 0.25 * offset).max(0.0))
    }
}

/// Terminal outcome of review polling.
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    pub state: ReviewState,
    pub result: BinaryReviewResult,
    /// Fetches it took to reach the outcome.
    pub attempts: u32,
}

impl ReviewOutcome {
    pub fn has_warnings(&self) -> bool {
        self.result.has_warnings()
    }

    pub fn summary(&self) -> String {
        self.result.summary()
    }
}

/// Progress event emitted during publishing.
#[derive(Debug, Clone, PartialEq)]
pub enum PublishEvent {
    Progress { progress: f64, status: String },
    /// A binary record was created or an existing one reused.
    Binary { binary_id: i32, created: bool },
    /// State seen by one review fetch.
    Review { attempt: u32, state: ReviewState },
}

impl PublishEvent {
    /// Queues the event without waiting. A full or closed channel drops it,
    /// so an unread receiver never stalls publishing.
    pub(crate) fn emit(self, events_tx: &mpsc::Sender<PublishEvent>) {
        if let Err(mpsc::error::TrySendError::Full(event)) = events_tx.try_send(self) {
            tracing::trace!(?event, "event channel full, dropping event");
        }
    }
}

/// Result of a successful release.
#[derive(Debug, Clone)]
pub struct PublishResult {
    pub binary_id: i32,
    /// False if an existing binary with the same version was updated.
    pub created: bool,
    pub software_versions: Vec<String>,
    pub review: ReviewOutcome,
}
