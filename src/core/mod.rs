pub mod package;
pub mod version;
pub mod workspace;

pub use package::{parse_kinds, Dependency, DependencyKind, Package};
pub use version::{Version, VersionReq};
pub use workspace::Workspace;
