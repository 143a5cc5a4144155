use std::path::Path;

use crate::core::package::{Dependency, DependencyKind, Package};
use crate::core::version::VersionReq;
use crate::ecosystem::traits::EcosystemPlugin;
use crate::error::{MonographError, Result};

pub struct NodePlugin;

const SECTIONS: [(&str, DependencyKind); 4] = [
    ("dependencies", DependencyKind::Normal),
    ("devDependencies", DependencyKind::Dev),
    ("peerDependencies", DependencyKind::Peer),
    ("optionalDependencies", DependencyKind::Optional),
];

impl NodePlugin {
    fn read_deps(
        map: &serde_json::Map<String, serde_json::Value>,
        kind: DependencyKind,
    ) -> Vec<Dependency> {
        map.iter()
            .filter_map(|(name, value)| value.as_str().map(|v| (name, v)))
            .map(|(name, value)| Dependency::with_range(name.as_str(), VersionReq::npm(value), kind))
            .collect()
    }
}

impl EcosystemPlugin for NodePlugin {
    fn file_patterns(&self) -> &'static [&'static str] {
        &["package.json"]
    }

    fn parse_package(&self, path: &Path, content: &str) -> Result<Option<Package>> {
        if path.file_name().and_then(|n| n.to_str()) != Some("package.json") {
            return Ok(None);
        }
        let value: serde_json::Value = serde_json::from_str(content)
            .map_err(|err| MonographError::Other(anyhow::Error::new(err)))?;
        let Some(name) = value.get("name").and_then(|v| v.as_str()) else {
            return Ok(None);
        };
        let version = value
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("0.0.0");

        let mut package = Package::new(name, version);
        for (key, kind) in SECTIONS {
            if let Some(map) = value.get(key).and_then(|v| v.as_object()) {
                package.dependencies.extend(Self::read_deps(map, kind));
            }
        }
        Ok(Some(package))
    }
}
