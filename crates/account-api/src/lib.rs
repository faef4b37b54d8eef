//! Store account API client for publishing extensions.
//!
//! Covers the calls an extension release needs: binary creation and
//! metadata updates, artifact and icon uploads, gallery images, and
//! automated code review. Also provides the platform version filter used
//! to pick the software versions a binary is compatible with.

pub mod binaries;
pub mod client;
pub mod error;
pub mod filter;
pub mod icon;
pub mod images;
pub mod review;
pub mod types;
mod upload;
pub mod version;

#[cfg(test)]
mod testutil;

pub use client::{Client, DEFAULT_BASE_URL, ProducerEndpoint};
pub use error::{Error, ErrorKind};
pub use filter::{filter_on_version, filter_on_version_names};
pub use icon::{ICON_SIZE, StoreIcon, normalize_icon};
pub use review::{ReviewState, strip_markup};
pub use types::{
    BinaryChangelog, BinaryReviewResult, BinaryStatus, ChangelogEntry, ExtensionBinary,
    ExtensionCreate, ExtensionImage, ExtensionUpdate, ImageDetail, Locale, SoftwareVersion,
    StatusInfo, SubCheckResult,
};
pub use version::{Constraints, Version, VersionError};
