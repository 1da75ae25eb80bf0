//! Add-on / release compatibility

use crate::source::types::{Package, Release};

/// Whether `package` may be offered to users of `release`
///
/// The release must not require add-ons newer than the package was tested
/// against, and the package must not require an API newer than the release.
pub fn is_compatible(package: &Package, release: &Release) -> bool {
    release.back_compat_to <= package.last_tested_version
        && package.min_required_version <= release.api_version
}
