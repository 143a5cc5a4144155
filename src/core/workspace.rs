use std::env;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::config::resolve::load_workspace_config;
use crate::config::{ConfigError, WorkspaceConfig};
use crate::core::package::Package;
use crate::ecosystem;

#[derive(Debug)]
pub struct Workspace {
    pub root: PathBuf,
    pub config: WorkspaceConfig,
    pub packages: Vec<Package>,
}

impl Workspace {
    pub fn load_from(root: PathBuf, config_path: PathBuf) -> Result<Self, ConfigError> {
        let mut config = load_workspace_config(&config_path)?;
        apply_env_overrides(&mut config);

        let packages = collect_packages(&root, &config)?;
        debug!(
            root = %root.display(),
            packages = packages.len(),
            "loaded workspace"
        );

        Ok(Self {
            root,
            config,
            packages,
        })
    }

    pub fn package(&self, name: &str) -> Option<&Package> {
        self.packages.iter().find(|package| package.name == name)
    }
}

fn apply_env_overrides(config: &mut WorkspaceConfig) {
    if let Ok(patterns) = env::var("MONOGRAPH_PACKAGES") {
        let patterns: Vec<String> = patterns
            .split(',')
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
            .map(str::to_string)
            .collect();
        if !patterns.is_empty() {
            config.workspace.packages = patterns;
        }
    }
}

fn collect_packages(root: &Path, config: &WorkspaceConfig) -> Result<Vec<Package>, ConfigError> {
    let mut found: IndexMap<String, Package> = IndexMap::new();

    for dir in package_dirs(root, &config.workspace.packages)? {
        let Some((id, manifest)) = ecosystem::detect(&dir) else {
            debug!(dir = %dir.display(), "no manifest, skipping");
            continue;
        };
        let content = std::fs::read_to_string(&manifest)?;
        let parsed = ecosystem::plugin_for(id)
            .parse_package(&manifest, &content)
            .map_err(|err| ConfigError::Manifest {
                path: manifest.clone(),
                source: anyhow::Error::new(err),
            })?;
        let Some(mut package) = parsed else {
            debug!(manifest = %manifest.display(), "manifest has no package name");
            continue;
        };
        if config.is_ignored(&package.name) {
            debug!(package = %package.name, "ignored by config");
            continue;
        }
        if let Some(existing) = found.get(&package.name) {
            return Err(ConfigError::DuplicatePackage {
                name: package.name,
                first: existing.path.clone(),
                second: dir,
            });
        }
        package.path = dir;
        found.insert(package.name.clone(), package);
    }

    Ok(found.into_values().collect())
}

// Sorted within each pattern, patterns in config order, each directory once.
fn package_dirs(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, ConfigError> {
    let mut dirs: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let full = root.join(pattern);
        let full = full.to_string_lossy();
        let entries = glob::glob(&full).map_err(|source| ConfigError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => matched.push(path),
                Ok(_) => {}
                Err(err) => warn!(error = %err, "unreadable path while expanding {pattern}"),
            }
        }
        matched.sort();
        for path in matched {
            if !dirs.contains(&path) {
                dirs.push(path);
            }
        }
    }
    Ok(dirs)
}
