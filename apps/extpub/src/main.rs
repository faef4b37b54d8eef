//! extpub entry point.
//!
//! Publishes the release described in the publisher configuration and
//! waits for the store's automated code review.

mod config;

use std::process::ExitCode;

use anyhow::Context;
use extpub_account_api::Client;
use extpub_publish::{PollConfig, PublishEvent, PublishPipeline};
use tracing_subscriber::EnvFilter;

use config::PublisherConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting extpub");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "publish failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = PublisherConfig::load()?;
    let release = config.release()?;

    let client = Client::new(&config.token)?.with_base_url(config.api_url.as_str());
    let catalog = client
        .get_software_versions()
        .await
        .context("fetching software version catalog")?;
    tracing::info!(count = catalog.len(), "software version catalog loaded");

    let producer = client.producer(config.producer_id);
    let mut pipeline = PublishPipeline::new(PollConfig::from(&config.poll));
    let mut events = pipeline
        .take_events()
        .context("pipeline events already taken")?;

    let cancel = pipeline.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, cancelling release");
            cancel.cancel();
        }
    });

    let reporter = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            log_event(&event);
        }
    });

    let result = pipeline.publish(&producer, release, &catalog).await;
    drop(pipeline);
    let _ = reporter.await;
    let result = result?;

    let summary = result.review.summary();
    if !summary.is_empty() {
        println!("{summary}");
    }
    println!(
        "published {} {} as binary {} ({})",
        release.extension_id,
        release.version,
        result.binary_id,
        result.software_versions.join(", ")
    );
    Ok(())
}

fn log_event(event: &PublishEvent) {
    match event {
        PublishEvent::Progress { progress, status } => {
            tracing::info!(progress = %format!("{:.0}%", progress * 100.0), "{status}");
        }
        PublishEvent::Binary { binary_id, created } => {
            tracing::debug!(binary_id, created, "binary ready");
        }
        PublishEvent::Review { attempt, state } => {
            tracing::debug!(attempt, ?state, "code review state");
        }
    }
}
