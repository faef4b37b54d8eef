//! Extension release pipeline.
//!
//! Composes the account API calls into one release: create or reuse the
//! binary record, upload the artifact and icon, trigger automated code
//! review and poll it to a terminal state.

pub mod connection;
pub mod error;
pub mod pipeline;
pub mod poller;
pub mod types;

#[cfg(test)]
mod testutil;

pub use connection::{StoreConnection, StoreFuture};
pub use error::PublishError;
pub use pipeline::PublishPipeline;
pub use poller::ReviewPoller;
pub use types::{PollConfig, PublishEvent, PublishResult, Release, ReviewOutcome};
