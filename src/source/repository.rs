//! Repository reader: a single-pass stream of add-on records
//!
//! The source tree holds one directory per add-on id with one document per
//! version (`<id>/<major>.<minor>[.<patch>].json`). Documents are read one
//! at a time as the stream is advanced, so only the record currently being
//! handed out is held in memory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, error, warn};
use walkdir::WalkDir;

use crate::source::error::SourceError;
use crate::source::types::Package;
use crate::source::validate::validate_addon;
use crate::version::Version;

static VERSION_FILE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+\.\d+(?:\.\d+)?)\.json$").expect("valid version file pattern")
});

/// Counters kept while a [`PackageStream`] is consumed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Documents that produced a package
    pub read: usize,
    /// Documents skipped because of a naming, JSON, schema or version error
    pub skipped: usize,
}

/// Single-pass stream of packages read from a source tree
///
/// The stream can be consumed exactly once. Polling it again after it has
/// returned `None` or a fatal error is a programmer error and panics in
/// debug builds. Skippable per-file failures are logged and counted, never
/// yielded; the only `Err` items are fatal filesystem errors.
pub struct PackageStream {
    root: PathBuf,
    entries: walkdir::IntoIter,
    stats: StreamStats,
    finished: bool,
}

impl PackageStream {
    /// Open a stream over `root`, which must be an existing directory
    pub fn open(root: &Path) -> Result<Self, SourceError> {
        let metadata = fs::metadata(root).map_err(|source| SourceError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(SourceError::Io {
                path: root.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotADirectory,
                    "source path is not a directory",
                ),
            });
        }

        Ok(Self {
            root: root.to_path_buf(),
            entries: WalkDir::new(root).sort_by_file_name().into_iter(),
            stats: StreamStats::default(),
            finished: false,
        })
    }

    pub fn stats(&self) -> StreamStats {
        self.stats
    }

    /// The add-on id implied by the directory holding `path`, if any
    fn inferred_id<'a>(&self, path: &'a Path) -> Option<&'a str> {
        let parent = path.parent()?;
        if parent == self.root {
            return None;
        }
        parent.file_name()?.to_str()
    }

    fn read_package(&self, path: &Path, file_version: &str) -> Result<Package, SourceError> {
        let file_version = Version::parse(file_version).map_err(|source| SourceError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        // Bytes, not a string: undecodable text is a JSON error, not an I/O one
        let content = fs::read(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let value = serde_json::from_slice(&content).map_err(|source| SourceError::Json {
            path: path.to_path_buf(),
            source,
        })?;

        let package = validate_addon(value, path, self.inferred_id(path))?;

        if package.version != file_version {
            warn!(
                "File name version {} of {:?} differs from addonVersionNumber {}",
                file_version, path, package.version
            );
        }

        Ok(package)
    }
}

impl Iterator for PackageStream {
    type Item = Result<Package, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        debug_assert!(!self.finished, "PackageStream polled after it was consumed");

        loop {
            let entry = match self.entries.next() {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(source)) => {
                    self.finished = true;
                    let path = source
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    return Some(Err(SourceError::Walk { path, source }));
                }
                Some(Ok(entry)) => entry,
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                debug!("Ignoring non-JSON file {:?}", path);
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            let Some(captures) = VERSION_FILE_PATTERN.captures(&file_name) else {
                warn!("Skipping {:?}: file name is not a version number", path);
                self.stats.skipped += 1;
                continue;
            };

            match self.read_package(path, &captures[1]) {
                Ok(package) => {
                    debug!("Read {} {} from {:?}", package.id, package.version, path);
                    self.stats.read += 1;
                    return Some(Ok(package));
                }
                Err(e) if e.is_skippable() => {
                    error!("Skipping add-on document: {}", e);
                    self.stats.skipped += 1;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
