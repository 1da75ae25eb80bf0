//! Release list reader

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::source::error::SourceError;
use crate::source::types::Release;
use crate::source::validate::validate_release_list;
use crate::version::VersionStyle;

/// Load and validate the release compatibility list
///
/// Any failure here is fatal to a run: without the release list there is
/// nothing to resolve against.
pub fn load_releases(path: &Path) -> Result<Vec<Release>, SourceError> {
    let content = fs::read(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = serde_json::from_slice(&content).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let releases = validate_release_list(value, path)?;

    for release in &releases {
        debug!(
            "Release {} (api {}, back compat to {})",
            release.release_version.format(VersionStyle::Release),
            release.api_version.format(VersionStyle::Release),
            release.back_compat_to.format(VersionStyle::Release),
        );
    }
    info!("Loaded {} releases from {:?}", releases.len(), path);

    Ok(releases)
}
