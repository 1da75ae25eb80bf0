//! Add-on compatibility views
//!
//! Resolves, for every release API version and distribution channel, the
//! newest add-on version compatible with it, and writes the result as a
//! tree of per-language JSON views.

pub mod config;
pub mod source;
pub mod transform;
pub mod version;

pub use config::TransformConfig;
pub use transform::{TransformError, TransformSummary, run_transformation};
