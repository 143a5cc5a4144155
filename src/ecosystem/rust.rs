use std::path::Path;

use crate::core::package::{Dependency, DependencyKind, Package};
use crate::ecosystem::traits::EcosystemPlugin;
use crate::error::{MonographError, Result};

pub struct RustPlugin;

const SECTIONS: [(&str, DependencyKind); 3] = [
    ("dependencies", DependencyKind::Normal),
    ("dev-dependencies", DependencyKind::Dev),
    ("build-dependencies", DependencyKind::Dev),
];

impl RustPlugin {
    fn read_deps(table: &toml::value::Table, section_kind: DependencyKind) -> Vec<Dependency> {
        let mut deps = Vec::new();
        for (key, value) in table {
            let (name, range, kind) = match value {
                toml::Value::String(s) => (key.as_str(), s.as_str(), section_kind),
                toml::Value::Table(t) => {
                    let name = t
                        .get("package")
                        .and_then(|v| v.as_str())
                        .unwrap_or(key.as_str());
                    let range = if let Some(version) = t.get("version").and_then(|v| v.as_str()) {
                        version
                    } else if t.get("workspace").and_then(|v| v.as_bool()) == Some(true) {
                        "workspace"
                    } else {
                        "*"
                    };
                    let optional = t.get("optional").and_then(|v| v.as_bool()) == Some(true);
                    let kind = if optional && section_kind == DependencyKind::Normal {
                        DependencyKind::Optional
                    } else {
                        section_kind
                    };
                    (name, range, kind)
                }
                _ => continue,
            };
            deps.push(Dependency::new(name, range, kind));
        }
        deps
    }
}

impl EcosystemPlugin for RustPlugin {
    fn file_patterns(&self) -> &'static [&'static str] {
        &["Cargo.toml"]
    }

    fn parse_package(&self, path: &Path, content: &str) -> Result<Option<Package>> {
        if path.file_name().and_then(|n| n.to_str()) != Some("Cargo.toml") {
            return Ok(None);
        }
        let value: toml::Value =
            toml::from_str(content).map_err(|err| MonographError::Other(anyhow::Error::new(err)))?;
        let Some(manifest) = value.get("package") else {
            return Ok(None);
        };
        let Some(name) = manifest.get("name").and_then(|v| v.as_str()) else {
            return Ok(None);
        };
        // `version.workspace = true` is a table, which leaves the version unknown.
        let version = manifest
            .get("version")
            .and_then(|v| v.as_str())
            .unwrap_or("0.0.0");

        let mut package = Package::new(name, version);
        for (section, kind) in SECTIONS {
            if let Some(table) = value.get(section).and_then(|t| t.as_table()) {
                package.dependencies.extend(Self::read_deps(table, kind));
            }
        }
        Ok(Some(package))
    }
}
