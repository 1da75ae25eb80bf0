//! Newest-wins selection of add-on versions per API version and channel

use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::debug;

use crate::source::types::{Channel, Package, PackageKey, Release};
use crate::transform::compat::is_compatible;
use crate::transform::error::TransformError;
use crate::transform::index::ResolutionIndex;
use crate::version::{Version, VersionStyle};

/// Folds packages into a [`ResolutionIndex`], one at a time
///
/// For every release a package is compatible with, it replaces the entry
/// for its id in `(release.api_version, package.channel)` when there is no
/// entry yet or the stored version is strictly older. Ids match without
/// regard to case. Two packages with the same id, channel and version are
/// rejected whatever order they arrive in.
pub struct Resolver<'a> {
    releases: &'a [Release],
    index: ResolutionIndex,
    /// Source path of every (id, channel, version) inserted so far; one small
    /// key per input document, document bodies are never kept
    seen: HashMap<(PackageKey, Channel, Version), PathBuf>,
}

impl<'a> Resolver<'a> {
    pub fn new(releases: &'a [Release]) -> Self {
        Self {
            releases,
            index: ResolutionIndex::with_api_versions(
                releases.iter().map(|release| release.api_version),
            ),
            seen: HashMap::new(),
        }
    }

    pub fn insert(&mut self, package: Package) -> Result<(), TransformError> {
        let identity = (package.key(), package.channel, package.version);
        if let Some(first) = self.seen.get(&identity) {
            return Err(TransformError::DuplicateVersion {
                id: package.id,
                version: package.version,
                channel: package.channel,
                first: first.clone(),
                second: package.source_path,
            });
        }
        self.seen.insert(identity, package.source_path.clone());
        self.index.add_languages(package.translations.keys());

        let key = package.key();
        let package = Rc::new(package);
        for release in self.releases {
            let api = release.api_version.format(VersionStyle::Release);

            if !is_compatible(&package, release) {
                debug!(
                    "Ignored {} {} for {} ({}): not compatible",
                    package.id, package.version, api, package.channel
                );
                continue;
            }

            let slot = self.index.slot_mut(release.api_version, package.channel);
            let stored_newer = slot
                .get(&key)
                .map(|stored| stored.version)
                .filter(|stored| *stored >= package.version);
            match stored_newer {
                Some(stored) => {
                    debug!(
                        "Ignored {} {} for {} ({}): already holds {}",
                        package.id, package.version, api, package.channel, stored
                    );
                }
                None => {
                    debug!(
                        "Added {} {} for {} ({})",
                        package.id, package.version, api, package.channel
                    );
                    slot.insert(key.clone(), Rc::clone(&package));
                }
            }
        }

        Ok(())
    }

    pub fn finish(self) -> ResolutionIndex {
        self.index
    }
}

/// Resolve a whole package sequence against `releases`
///
/// `packages` is consumed in a single pass.
pub fn resolve(
    packages: impl IntoIterator<Item = Package>,
    releases: &[Release],
) -> Result<ResolutionIndex, TransformError> {
    let mut resolver = Resolver::new(releases);
    for package in packages {
        resolver.insert(package)?;
    }
    Ok(resolver.finish())
}
