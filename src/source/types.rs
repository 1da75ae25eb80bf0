//! Records produced by the release and repository readers

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::version::Version;

/// Distribution track of an add-on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Beta,
    Dev,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Stable, Channel::Beta, Channel::Dev];

    /// Returns the string representation used in documents and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Beta => "beta",
            Channel::Dev => "dev",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stable" => Ok(Channel::Stable),
            "beta" => Ok(Channel::Beta),
            "dev" => Ok(Channel::Dev),
            _ => Err(()),
        }
    }
}

/// A published platform release and the API range it accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    pub release_version: Version,
    /// Compatibility-relevant identity; several releases may share one
    pub api_version: Version,
    /// Oldest API version this release can run add-ons tested against
    pub back_compat_to: Version,
    pub description: Option<String>,
}

impl Release {
    /// A release whose version equals its API version
    pub fn new(api_version: Version, back_compat_to: Version) -> Self {
        Self {
            release_version: api_version,
            api_version,
            back_compat_to,
            description: None,
        }
    }
}

/// Localized display strings for one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub language: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One version of one add-on, as read from a single source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Identifier with its original casing
    pub id: String,
    pub version: Version,
    pub channel: Channel,
    /// Lowest API version the add-on supports
    pub min_required_version: Version,
    /// Highest API version the add-on was tested against
    pub last_tested_version: Version,
    /// Document this record was read from
    pub source_path: PathBuf,
    /// Translations keyed by language, in document order
    pub translations: IndexMap<String, Translation>,
}

impl Package {
    pub fn new(
        id: impl Into<String>,
        version: Version,
        channel: Channel,
        min_required_version: Version,
        last_tested_version: Version,
        source_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            id: id.into(),
            version,
            channel,
            min_required_version,
            last_tested_version,
            source_path: source_path.into(),
            translations: IndexMap::new(),
        }
    }

    pub fn with_translation(mut self, translation: Translation) -> Self {
        self.translations
            .insert(translation.language.clone(), translation);
        self
    }

    pub fn key(&self) -> PackageKey {
        PackageKey::new(&self.id)
    }
}

/// Case-insensitive add-on identity that keeps the original spelling
///
/// Equality, ordering and hashing use the lower-cased id; `as_str` returns
/// the id as it was read.
#[derive(Debug, Clone)]
pub struct PackageKey {
    original: String,
    folded: String,
}

impl PackageKey {
    pub fn new(id: &str) -> Self {
        Self {
            original: id.to_string(),
            folded: id.to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl PartialEq for PackageKey {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for PackageKey {}

impl PartialOrd for PackageKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.folded.cmp(&other.folded)
    }
}

impl Hash for PackageKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

impl fmt::Display for PackageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}
