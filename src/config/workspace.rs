use std::collections::HashMap;

use serde::Deserialize;

use crate::core::package::DependencyKind;

#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceSettings {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_package_patterns")]
    pub packages: Vec<String>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            packages: default_package_patterns(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphSettings {
    #[serde(default = "default_kinds")]
    pub kinds: Vec<DependencyKind>,
    #[serde(default = "default_cycle_warning_kinds")]
    pub cycle_warning_kinds: Vec<DependencyKind>,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            kinds: default_kinds(),
            cycle_warning_kinds: default_cycle_warning_kinds(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceConfig {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub graph: GraphSettings,
    #[serde(default)]
    pub packages: HashMap<String, PackageEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageEntry {
    #[serde(default)]
    pub ignored: bool,
}

impl WorkspaceConfig {
    pub fn is_ignored(&self, package: &str) -> bool {
        self.packages
            .get(package)
            .map(|entry| entry.ignored)
            .unwrap_or(false)
    }
}

fn default_package_patterns() -> Vec<String> {
    vec!["packages/*".to_string()]
}

fn default_kinds() -> Vec<DependencyKind> {
    DependencyKind::ALL.to_vec()
}

fn default_cycle_warning_kinds() -> Vec<DependencyKind> {
    vec![DependencyKind::Normal, DependencyKind::Dev]
}

#[cfg(test)]
mod tests {
    use crate::config::WorkspaceConfig;
    use crate::core::package::DependencyKind;

    #[test]
    fn empty_config_uses_defaults() {
        let config: WorkspaceConfig = toml::from_str("").expect("parse empty config");
        assert_eq!(config.workspace.packages, vec!["packages/*"]);
        assert_eq!(config.graph.kinds, DependencyKind::ALL.to_vec());
        assert_eq!(
            config.graph.cycle_warning_kinds,
            vec![DependencyKind::Normal, DependencyKind::Dev]
        );
        assert!(!config.is_ignored("anything"));
    }

    #[test]
    fn parses_graph_settings_and_package_entries() {
        let config: WorkspaceConfig = toml::from_str(
            r#"[workspace]
name = "mono"
packages = ["packages/*", "apps/*"]

[graph]
kinds = ["normal", "peer"]
cycle_warning_kinds = ["normal", "dev", "peer", "optional"]

[packages."legacy"]
ignored = true
"#,
        )
        .expect("parse config");
        assert_eq!(config.workspace.name, "mono");
        assert_eq!(config.workspace.packages.len(), 2);
        assert_eq!(
            config.graph.kinds,
            vec![DependencyKind::Normal, DependencyKind::Peer]
        );
        assert_eq!(config.graph.cycle_warning_kinds.len(), 4);
        assert!(config.is_ignored("legacy"));
    }

    #[test]
    fn kinds_accept_manifest_section_names() {
        let config: WorkspaceConfig = toml::from_str(
            r#"[graph]
kinds = ["dependencies", "devDependencies", "Peer"]
cycle_warning_kinds = ["prod"]
"#,
        )
        .expect("parse config");
        assert_eq!(
            config.graph.kinds,
            vec![DependencyKind::Normal, DependencyKind::Dev, DependencyKind::Peer]
        );
        assert_eq!(config.graph.cycle_warning_kinds, vec![DependencyKind::Normal]);
    }

    #[test]
    fn rejects_unknown_kind() {
        let result: Result<WorkspaceConfig, _> = toml::from_str("[graph]\nkinds = [\"runtime\"]\n");
        let err = result.expect_err("runtime is not a kind");
        assert!(err.to_string().contains("unknown dependency kind 'runtime'"), "{err}");
    }
}
