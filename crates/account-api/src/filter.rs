//! Selects the platform versions a release is compatible with.
//!
//! Entries that are not selectable or whose names do not parse as
//! versions are skipped silently; an empty result is a valid outcome.

use crate::types::SoftwareVersion;
use crate::version::{Constraints, Version};

fn is_compatible(software_version: &SoftwareVersion, constraints: &Constraints) -> bool {
    if !software_version.selectable {
        return false;
    }

    match software_version.name.parse::<Version>() {
        Ok(version) => constraints.check(&version),
        Err(_) => false,
    }
}

/// Returns the catalog entries matching `constraints`, in catalog order.
pub fn filter_on_version(
    versions: &[SoftwareVersion],
    constraints: &Constraints,
) -> Vec<SoftwareVersion> {
    versions
        .iter()
        .filter(|sv| is_compatible(sv, constraints))
        .cloned()
        .collect()
}

/// Like [`filter_on_version`], but returns only the version names.
pub fn filter_on_version_names(
    versions: &[SoftwareVersion],
    constraints: &Constraints,
) -> Vec<String> {
    versions
        .iter()
        .filter(|sv| is_compatible(sv, constraints))
        .map(|sv| sv.name.clone())
        .collect()
}
