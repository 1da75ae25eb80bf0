use std::path::PathBuf;

// =============================================================================
// Output layout
// =============================================================================

/// Language of the untranslated source documents
pub const DEFAULT_LANGUAGE: &str = "en";

/// Directory name holding the newest view of every add-on and channel
pub const LATEST_DIR: &str = "latest";

/// Log filter used when neither RUST_LOG nor --loglevel is given
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Paths for a single transformation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// JSON list of releases and their API compatibility
    pub release_file: PathBuf,
    /// Tree of `<addonId>/<version>.json` documents
    pub source_dir: PathBuf,
    /// Where views are written; must not exist yet
    pub output_dir: PathBuf,
}

impl TransformConfig {
    pub fn new(
        release_file: impl Into<PathBuf>,
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            release_file: release_file.into(),
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
        }
    }
}

/// Map a `--loglevel` value to a tracing filter directive
///
/// Accepts tracing level names and the legacy `WARNING`/`CRITICAL` names,
/// case-insensitively.
pub fn log_filter(level: &str) -> Option<&'static str> {
    match level.to_ascii_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" | "warning" => Some("warn"),
        "error" | "critical" | "fatal" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}
