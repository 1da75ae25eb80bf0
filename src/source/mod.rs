//! Input layer
//! - types.rs: Release, Package, Channel, Translation and PackageKey
//! - validate.rs: structural validation of release lists and add-on documents
//! - releases.rs: release list reader
//! - repository.rs: single-pass add-on document stream
//! - schema.rs: validation of a data file against a JSON Schema file
//! - error.rs: SourceError and SchemaViolation

pub mod error;
pub mod releases;
pub mod repository;
pub mod schema;
pub mod types;
pub mod validate;

pub use error::{SchemaViolation, SourceError};
pub use releases::load_releases;
pub use repository::{PackageStream, StreamStats};
pub use schema::validate_with_schema;
pub use types::{Channel, Package, PackageKey, Release, Translation};
