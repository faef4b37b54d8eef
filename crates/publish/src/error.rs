//! Publish error types.

/// Errors produced while publishing a release.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error(transparent)]
    Api(#[from] extpub_account_api::Error),

    #[error("invalid compatibility constraint: {0}")]
    Constraint(#[from] extpub_account_api::VersionError),

    #[error("no selectable software version matches {0}")]
    NoCompatibleVersions(String),

    #[error("automatic code review failed:\n{summary}")]
    ReviewFailed { summary: String },

    #[error("code review still pending after {attempts} attempts")]
    ReviewTimeout { attempts: u32 },

    #[error("cancelled")]
    Cancelled,
}
