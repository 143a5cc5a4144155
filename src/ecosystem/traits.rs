use std::path::Path;

use crate::core::package::Package;
use crate::error::Result;

pub trait EcosystemPlugin: Send + Sync {
    fn file_patterns(&self) -> &'static [&'static str];
    /// `Ok(None)` when the manifest does not describe a named package, such
    /// as a private workspace root.
    fn parse_package(&self, path: &Path, content: &str) -> Result<Option<Package>>;
}
