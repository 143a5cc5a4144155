pub mod resolve;
pub mod workspace;

pub use workspace::{GraphSettings, PackageEntry, WorkspaceConfig, WorkspaceSettings};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("workspace not found")]
    WorkspaceNotFound,
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("invalid workspace root: {0}")]
    InvalidWorkspace(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid package pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("failed to read manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    #[error("package {name} is declared twice: {first} and {second}")]
    DuplicatePackage {
        name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
