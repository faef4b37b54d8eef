//! Automated code review: trigger, fetch and interpretation.
//!
//! The backend identifies a review outcome by a numeric id and by a
//! name; either may be the one that is set, so both are checked.

use reqwest::Method;
use scraper::{Html, Node};

use crate::client::ProducerEndpoint;
use crate::error::{Error, OpContext};
use crate::types::{BinaryReviewResult, StatusInfo};

pub const REVIEW_SUCCEEDED_ID: i32 = 3;
pub const REVIEW_SUCCEEDED_NAME: &str = "automaticcodereviewsucceeded";
pub const REVIEW_PENDING_ID: i32 = 4;

/// Where a review stands, as seen by one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Pending,
    Succeeded,
    Failed,
}

impl ReviewState {
    pub fn classify(kind: &StatusInfo) -> Self {
        if kind.id == REVIEW_SUCCEEDED_ID || kind.name == REVIEW_SUCCEEDED_NAME {
            Self::Succeeded
        } else if kind.id == REVIEW_PENDING_ID {
            Self::Pending
        } else {
            Self::Failed
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Self::Pending
    }
}

impl BinaryReviewResult {
    pub fn state(&self) -> ReviewState {
        ReviewState::classify(&self.kind)
    }

    pub fn has_passed(&self) -> bool {
        self.state() == ReviewState::Succeeded
    }

    pub fn is_pending(&self) -> bool {
        self.state() == ReviewState::Pending
    }

    /// True if any sub-check reported warnings, passed or not.
    pub fn has_warnings(&self) -> bool {
        self.sub_check_results.iter().any(|r| r.has_warnings)
    }

    /// Collects the messages of failed or warning sub-checks.
    ///
    /// Each entry is `=== name ===` followed by the message with all
    /// markup removed and a blank line.
    pub fn summary(&self) -> String {
        let mut message = String::new();

        for result in &self.sub_check_results {
            if result.passed && !result.has_warnings {
                continue;
            }

            message.push_str(&format!("=== {} ===\n", result.sub_check));
            message.push_str(&strip_markup(&result.message));
            message.push_str("\n\n");
        }

        message
    }
}

/// Reduces an HTML fragment to its text, dropping script and style bodies.
pub fn strip_markup(fragment: &str) -> String {
    let html = Html::parse_fragment(fragment);
    let mut text = String::new();

    for node in html.tree.root().descendants() {
        let Node::Text(t) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            matches!(a.value(), Node::Element(e) if matches!(e.name(), "script" | "style"))
        });
        if !hidden {
            text.push_str(t);
        }
    }

    text
}

impl ProducerEndpoint<'_> {
    /// Asks the backend to (re)run automated review for the latest binary.
    ///
    /// Returns as soon as the request is accepted; poll
    /// [`get_binary_review_results`](Self::get_binary_review_results) for the outcome.
    pub async fn trigger_code_review(&self, extension_id: i32) -> Result<(), Error> {
        let req = self
            .client
            .request(Method::POST, &format!("/plugins/{extension_id}/reviews"));
        self.client.send(req).await.op("trigger_code_review")?;
        Ok(())
    }

    /// Fetches the review results recorded for a binary, oldest first.
    pub async fn get_binary_review_results(
        &self,
        extension_id: i32,
        binary_id: i32,
    ) -> Result<Vec<BinaryReviewResult>, Error> {
        self.client
            .get_json(&format!(
                "/plugins/{extension_id}/binaries/{binary_id}/checkresults"
            ))
            .await
            .op("get_binary_review_results")
    }
}
