//! Version model shared by releases and add-ons
//!
//! - [`model`]: the ordered `Version` triple and its two rendering styles
//! - [`error`]: `FormatError` for malformed version strings and objects

pub mod error;
pub mod model;

pub use error::FormatError;
pub use model::{Version, VersionStyle};
