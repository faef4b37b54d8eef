//! Request and response types for the store account API.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads an id the backend may omit or send as `null`.
fn id_or_zero<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    Option::<i32>::deserialize(d).map(Option::unwrap_or_default)
}

/// A `{id, name, description}` status record.
///
/// The backend uses the same shape for binary status and review type,
/// and either key may be the one that identifies the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusInfo {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Locale {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default)]
    pub name: String,
}

/// A platform release an extension can declare compatibility with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareVersion {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub selectable: bool,
}

/// A changelog entry as returned on an existing binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinaryChangelog {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub text: String,
}

/// Coarse lifecycle state of an uploaded binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryStatus {
    InReview,
    Approved,
    Rejected,
    Other,
}

/// An uploaded build of an extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionBinary {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub status: StatusInfo,
    #[serde(default)]
    pub compatible_software_versions: Vec<SoftwareVersion>,
    #[serde(default)]
    pub changelogs: Vec<BinaryChangelog>,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub last_change_date: String,
    #[serde(default)]
    pub ion_cube_encrypted: bool,
    #[serde(default)]
    pub license_check_required: bool,
    #[serde(default)]
    pub has_active_code_review_warnings: bool,
}

impl ExtensionBinary {
    /// Classifies the backend status name.
    ///
    /// Only the `codereview*` names are mapped. They mirror the
    /// `automaticcodereview*` review type names; every other name, and a
    /// missing status, is [`BinaryStatus::Other`].
    pub fn status_kind(&self) -> BinaryStatus {
        match self.status.name.as_str() {
            "codereviewpending" => BinaryStatus::InReview,
            "codereviewsucceeded" => BinaryStatus::Approved,
            "codereviewfailed" => BinaryStatus::Rejected,
            _ => BinaryStatus::Other,
        }
    }
}

/// A changelog entry on the write side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChangelogEntry {
    /// Locale code, e.g. `en_GB`.
    pub locale: String,
    pub text: String,
}

/// Metadata update for an existing binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionUpdate {
    /// Binary id; carried in the request path only.
    #[serde(skip)]
    pub id: i32,
    pub software_versions: Vec<String>,
    pub ion_cube_encrypted: bool,
    pub license_check_required: bool,
    pub changelogs: Vec<ChangelogEntry>,
}

/// Payload for creating a new binary.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionCreate {
    pub software_versions: Vec<String>,
    pub changelogs: Vec<ChangelogEntry>,
    pub version: String,
}

/// Per-locale metadata of a gallery image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDetail {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub activated: bool,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub locale: Locale,
}

/// A screenshot in an extension's store gallery.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionImage {
    pub id: i32,
    #[serde(default)]
    pub remote_link: String,
    #[serde(default)]
    pub details: Vec<ImageDetail>,
    /// Display position; lower values are shown first.
    #[serde(default)]
    pub priority: i32,
}

impl ExtensionImage {
    /// Returns the detail record for a locale name such as `en_GB`.
    pub fn detail_mut(&mut self, locale: &str) -> Option<&mut ImageDetail> {
        self.details.iter_mut().find(|d| d.locale.name == locale)
    }
}

/// Outcome of one named analysis within a code review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCheckResult {
    pub sub_check: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub passed: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub has_warnings: bool,
}

/// A code review result produced asynchronously by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BinaryReviewResult {
    #[serde(default, deserialize_with = "id_or_zero")]
    pub id: i32,
    #[serde(default, deserialize_with = "id_or_zero")]
    pub binary_id: i32,
    #[serde(rename = "type", default)]
    pub kind: StatusInfo,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub creation_date: String,
    #[serde(default)]
    pub sub_check_results: Vec<SubCheckResult>,
}
