//! Compatibility resolution and view materialization
//!
//! # Pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │  Releases   │────▶│  Resolver   │────▶│ Materializer │───▶ output tree
//! │   (list)    │     │ (newest win)│     │ (views)      │
//! └─────────────┘     └─────────────┘     └──────────────┘
//!                            ▲
//! ┌─────────────┐            │
//! │ Repository  │────────────┘
//! │  (stream)   │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compat`]: the add-on / release compatibility predicate
//! - [`index`]: `ResolutionIndex`, the resolver's output
//! - [`resolver`]: newest-wins selection per API version and channel
//! - [`materializer`]: writes per-language views and `latest` pointers
//! - [`error`]: `TransformError`

pub mod compat;
pub mod error;
pub mod index;
pub mod materializer;
pub mod resolver;

pub use compat::is_compatible;
pub use error::TransformError;
pub use index::{ChannelTable, ResolutionIndex};
pub use materializer::{Materializer, ViewSegment, view_path};
pub use resolver::{Resolver, resolve};

use std::collections::BTreeSet;

use tracing::info;

use crate::config::TransformConfig;
use crate::source::{PackageStream, load_releases};

/// Counts reported by a finished run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformSummary {
    pub releases: usize,
    pub api_versions: usize,
    pub packages_read: usize,
    pub packages_skipped: usize,
    pub views_written: usize,
}

/// Run a full transformation from the inputs in `config`
///
/// The output directory must not exist; it is checked before anything is
/// read so that a tree left behind by an aborted run is never mistaken for
/// a complete one.
pub fn run_transformation(config: &TransformConfig) -> Result<TransformSummary, TransformError> {
    let output_exists = config
        .output_dir
        .try_exists()
        .map_err(|source| TransformError::Io {
            path: config.output_dir.clone(),
            source,
        })?;
    if output_exists {
        return Err(TransformError::OutputAlreadyExists(config.output_dir.clone()));
    }

    let releases = load_releases(&config.release_file).map_err(TransformError::Releases)?;
    let api_versions: BTreeSet<_> = releases.iter().map(|r| r.api_version).collect();

    let mut stream = PackageStream::open(&config.source_dir)?;
    let mut resolver = Resolver::new(&releases);
    for package in stream.by_ref() {
        resolver.insert(package?)?;
    }
    let stream_stats = stream.stats();
    let index = resolver.finish();
    info!(
        "Resolved {} entries from {} add-on documents ({} skipped)",
        index.len(),
        stream_stats.read,
        stream_stats.skipped
    );

    let stats = Materializer::new(&config.output_dir).write(index)?;

    Ok(TransformSummary {
        releases: releases.len(),
        api_versions: api_versions.len(),
        packages_read: stream_stats.read,
        packages_skipped: stream_stats.skipped,
        views_written: stats.views_written,
    })
}
