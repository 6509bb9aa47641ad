//! Version-bearing manifest files.
use semver::Version;

use crate::error::Result;

mod package_json;

pub use package_json::JsonManifest;

/// Reads and writes the version stored in a project manifest. Paths are
/// relative to the directory the store was created for.
#[cfg_attr(test, mockall::automock)]
pub trait ManifestStore {
    fn exists(&self, path: &str) -> bool;

    /// Current version recorded in the manifest at `path`.
    fn read_version(&self, path: &str) -> Result<Version>;

    /// Rewrite the manifest at `path` with `version`, indenting nested
    /// values by `indent` spaces.
    fn write_version(
        &self,
        path: &str,
        version: &Version,
        indent: usize,
    ) -> Result<()>;
}
