//! Code review polling.
//!
//! Repeats the single-shot review fetch on a [`PollConfig`] schedule
//! until the latest result is terminal, attempts run out, or the
//! cancellation token fires.

use extpub_account_api::ReviewState;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::connection::StoreConnection;
use crate::error::PublishError;
use crate::types::{PollConfig, PublishEvent, ReviewOutcome};

/// Polls review results for one binary.
pub struct ReviewPoller<'a> {
    conn: &'a dyn StoreConnection,
    config: PollConfig,
    cancel: CancellationToken,
}

impl<'a> ReviewPoller<'a> {
    pub fn new(conn: &'a dyn StoreConnection, config: PollConfig, cancel: CancellationToken) -> Self {
        Self {
            conn,
            config,
            cancel,
        }
    }

    /// Waits for a terminal review state.
    ///
    /// Every fetch emits a [`PublishEvent::Review`]. The newest result
    /// decides the state; no results yet counts as pending.
    pub async fn wait_for_review(
        &self,
        extension_id: i32,
        binary_id: i32,
        events_tx: &mpsc::Sender<PublishEvent>,
    ) -> Result<ReviewOutcome, PublishError> {
        let mut attempt: u32 = 0;

        loop {
            if self.config.max_attempts > 0 && attempt >= self.config.max_attempts {
                return Err(PublishError::ReviewTimeout { attempts: attempt });
            }
            attempt += 1;

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(PublishError::Cancelled),
                _ = tokio::time::sleep(self.config.delay_for_attempt(attempt)) => {}
            }

            let mut results = self.conn.review_results(extension_id, binary_id).await?;
            let latest = results.pop();
            let state = latest.as_ref().map_or(ReviewState::Pending, |r| r.state());

            debug!(extension_id, binary_id, attempt, ?state, "review polled");
            PublishEvent::Review { attempt, state }.emit(events_tx);

            if let Some(result) = latest
                && state.is_terminal()
            {
                return Ok(ReviewOutcome {
                    state,
                    result,
                    attempts: attempt,
                });
            }
        }
    }
}
