use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::version::{Version, VersionReq};
use crate::graph::GraphError;

/// The section of a manifest a dependency was declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Normal,
    Dev,
    Peer,
    Optional,
}

impl DependencyKind {
    pub const ALL: [DependencyKind; 4] = [
        DependencyKind::Normal,
        DependencyKind::Dev,
        DependencyKind::Peer,
        DependencyKind::Optional,
    ];

    /// Highest priority first. Everything that needs a single kind for an edge
    /// goes through this table.
    pub const PRECEDENCE: [DependencyKind; 4] = Self::ALL;

    pub fn label(&self) -> &'static str {
        match self {
            DependencyKind::Normal => "normal",
            DependencyKind::Dev => "dev",
            DependencyKind::Peer => "peer",
            DependencyKind::Optional => "optional",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DependencyKind {
    type Err = GraphError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "normal" | "prod" | "dependencies" => Ok(DependencyKind::Normal),
            "dev" | "devdependencies" => Ok(DependencyKind::Dev),
            "peer" | "peerdependencies" => Ok(DependencyKind::Peer),
            "optional" | "optionaldependencies" => Ok(DependencyKind::Optional),
            _ => Err(GraphError::UnknownKind(input.to_string())),
        }
    }
}

// Config files accept the same spellings as `--kinds`.
impl<'de> Deserialize<'de> for DependencyKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn parse_kinds(values: &[String]) -> Result<Vec<DependencyKind>, GraphError> {
    let mut kinds = Vec::new();
    for value in values {
        let kind = value.parse::<DependencyKind>()?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version_range: VersionReq,
    pub kind: DependencyKind,
}

impl Dependency {
    pub fn new(name: impl Into<String>, version_range: &str, kind: DependencyKind) -> Self {
        Self::with_range(name, VersionReq::new(version_range), kind)
    }

    pub fn with_range(name: impl Into<String>, version_range: VersionReq, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            version_range,
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub version: Version,
    pub path: PathBuf,
    pub dependencies: Vec<Dependency>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: &str) -> Self {
        Self {
            name: name.into(),
            version: Version::new(version),
            path: PathBuf::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_dependency(mut self, name: &str, version_range: &str, kind: DependencyKind) -> Self {
        self.dependencies
            .push(Dependency::new(name, version_range, kind));
        self
    }

    pub fn dependencies_of_kinds<'p>(
        &'p self,
        kinds: &'p [DependencyKind],
    ) -> impl Iterator<Item = &'p Dependency> + 'p {
        self.dependencies
            .iter()
            .filter(move |dep| kinds.contains(&dep.kind))
    }
}
