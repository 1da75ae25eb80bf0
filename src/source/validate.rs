//! Structural validation of release lists and add-on documents
//!
//! Documents are checked by deserializing into typed records and then
//! applying the constraints the type system cannot express (id and
//! language patterns). Any failure is reported as a [`SchemaViolation`]
//! naming the offending file.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::source::error::SchemaViolation;
use crate::source::types::{Channel, Package, Release, Translation};
use crate::version::Version;

/// Ids become path components, so the first character must be alphanumeric
static ADDON_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("valid add-on id pattern")
});

static LANGUAGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}([_-][A-Za-z]{2,4})?$").expect("valid language pattern")
});

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseRecord {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "NVDAVersion")]
    nvda_version: Option<Version>,
    api_ver: Version,
    back_compat_to: Version,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddonDocument {
    #[serde(default)]
    addon_id: Option<String>,
    addon_version_number: Version,
    #[serde(rename = "minNVDAVersion")]
    min_nvda_version: Version,
    last_tested_version: Version,
    channel: Channel,
    #[serde(default)]
    translations: Vec<Translation>,
}

/// Validate a release list document
pub fn validate_release_list(value: Value, path: &Path) -> Result<Vec<Release>, SchemaViolation> {
    if !value.is_array() {
        return Err(SchemaViolation::new(path, "release list must be a JSON array"));
    }

    let records: Vec<ReleaseRecord> = serde_json::from_value(value)
        .map_err(|e| SchemaViolation::new(path, e.to_string()))?;

    Ok(records
        .into_iter()
        .map(|record| Release {
            release_version: record.nvda_version.unwrap_or(record.api_ver),
            api_version: record.api_ver,
            back_compat_to: record.back_compat_to,
            description: record.description,
        })
        .collect())
}

/// Validate an add-on document and build its [`Package`]
///
/// `inferred_id` is used when the document carries no `addonId`; it is
/// normally the name of the directory holding the document.
pub fn validate_addon(
    value: Value,
    path: &Path,
    inferred_id: Option<&str>,
) -> Result<Package, SchemaViolation> {
    if !value.is_object() {
        return Err(SchemaViolation::new(path, "add-on document must be a JSON object"));
    }

    let doc: AddonDocument = serde_json::from_value(value)
        .map_err(|e| SchemaViolation::new(path, e.to_string()))?;

    let id = doc
        .addon_id
        .or_else(|| inferred_id.map(str::to_string))
        .ok_or_else(|| {
            SchemaViolation::new(path, "addonId is missing and cannot be inferred from the path")
        })?;

    if !ADDON_ID_PATTERN.is_match(&id) {
        return Err(SchemaViolation::new(path, format!("invalid addonId {id:?}")));
    }

    if doc.min_nvda_version > doc.last_tested_version {
        warn!(
            "{:?}: minNVDAVersion {} is newer than lastTestedVersion {}",
            path, doc.min_nvda_version, doc.last_tested_version
        );
    }

    let mut package = Package::new(
        id,
        doc.addon_version_number,
        doc.channel,
        doc.min_nvda_version,
        doc.last_tested_version,
        path,
    );

    for translation in doc.translations {
        if !LANGUAGE_PATTERN.is_match(&translation.language) {
            return Err(SchemaViolation::new(
                path,
                format!("invalid translation language {:?}", translation.language),
            ));
        }
        package = package.with_translation(translation);
    }

    Ok(package)
}
