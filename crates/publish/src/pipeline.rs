//! Release pipeline.
//!
//! Drives one release through the store: binary record, artifact upload,
//! icon, code review trigger, and review polling. Steps run strictly in
//! order and the first failure aborts the release. Nothing is rolled
//! back, so a created binary without an attached file can be left behind.

use extpub_account_api::{
    Constraints, ExtensionCreate, ExtensionUpdate, ReviewState, SoftwareVersion,
    filter_on_version_names,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::connection::StoreConnection;
use crate::error::PublishError;
use crate::poller::ReviewPoller;
use crate::types::{PollConfig, PublishEvent, PublishResult, Release};

/// Publishes releases and reports progress as [`PublishEvent`]s.
pub struct PublishPipeline {
    poll: PollConfig,
    events_tx: mpsc::Sender<PublishEvent>,
    events_rx: Option<mpsc::Receiver<PublishEvent>>,
    cancel: CancellationToken,
}

impl Default for PublishPipeline {
    fn default() -> Self {
        Self::new(PollConfig::default())
    }
}

impl PublishPipeline {
    pub fn new(poll: PollConfig) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            poll,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<PublishEvent>> {
        self.events_rx.take()
    }

    /// Returns a cancellation token for this pipeline.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Publishes one release.
    ///
    /// `catalog` is the platform's software version list; the release
    /// constraint selects the versions the binary is marked compatible with.
    pub async fn publish(
        &self,
        conn: &dyn StoreConnection,
        release: &Release,
        catalog: &[SoftwareVersion],
    ) -> Result<PublishResult, PublishError> {
        let ext = release.extension_id;

        let constraints: Constraints = release.constraint.parse()?;
        let software_versions = filter_on_version_names(catalog, &constraints);
        if software_versions.is_empty() {
            return Err(PublishError::NoCompatibleVersions(
                release.constraint.clone(),
            ));
        }
        info!(
            extension_id = ext,
            version = %release.version,
            compatible = software_versions.len(),
            "publishing release"
        );

        self.check_cancelled()?;
        self.emit_progress(0.0, "Looking up existing binaries");
        let existing = conn
            .list_binaries(ext)
            .await?
            .into_iter()
            .find(|b| b.version == release.version);

        self.check_cancelled()?;
        let (binary_id, created) = match existing {
            Some(binary) => {
                self.emit_progress(0.1, "Updating binary");
                let update = ExtensionUpdate {
                    id: binary.id,
                    software_versions: software_versions.clone(),
                    ion_cube_encrypted: release.ion_cube_encrypted,
                    license_check_required: release.license_check_required,
                    changelogs: release.changelogs.clone(),
                };
                conn.update_binary_info(ext, &update).await?;
                info!(
                    extension_id = ext,
                    binary_id = binary.id,
                    status = ?binary.status_kind(),
                    "reusing existing binary"
                );
                (binary.id, false)
            }
            None => {
                self.emit_progress(0.1, "Creating binary");
                let create = ExtensionCreate {
                    software_versions: software_versions.clone(),
                    changelogs: release.changelogs.clone(),
                    version: release.version.clone(),
                };
                let binary = conn.create_binary(ext, &create).await?;
                info!(extension_id = ext, binary_id = binary.id, "created binary");
                (binary.id, true)
            }
        };
        PublishEvent::Binary { binary_id, created }.emit(&self.events_tx);

        self.check_cancelled()?;
        self.emit_progress(0.3, "Uploading artifact");
        conn.upload_binary_file(ext, binary_id, &release.artifact)
            .await?;

        if let Some(icon) = &release.icon {
            self.check_cancelled()?;
            self.emit_progress(0.5, "Uploading icon");
            conn.upload_icon(ext, icon).await?;
        }

        self.check_cancelled()?;
        self.emit_progress(0.6, "Triggering code review");
        conn.trigger_code_review(ext).await?;

        self.emit_progress(0.7, "Waiting for code review");
        let poller = ReviewPoller::new(conn, self.poll.clone(), self.cancel.clone());
        let review = poller
            .wait_for_review(ext, binary_id, &self.events_tx)
            .await?;

        if review.state == ReviewState::Failed {
            return Err(PublishError::ReviewFailed {
                summary: review.summary(),
            });
        }
        if review.has_warnings() {
            warn!(
                extension_id = ext,
                binary_id,
                "code review passed with warnings:\n{}",
                review.summary()
            );
        }

        self.emit_progress(1.0, "Published");
        info!(extension_id = ext, binary_id, attempts = review.attempts, "release published");

        Ok(PublishResult {
            binary_id,
            created,
            software_versions,
            review,
        })
    }

    fn check_cancelled(&self) -> Result<(), PublishError> {
        if self.cancel.is_cancelled() {
            Err(PublishError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn emit_progress(&self, progress: f64, status: &str) {
        PublishEvent::Progress {
            progress,
            status: status.to_string(),
        }
        .emit(&self.events_tx);
    }
}
