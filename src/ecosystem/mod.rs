use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcosystemId {
    Node,
    Rust,
}

pub mod node;
pub mod rust;
pub mod traits;

pub fn plugin_for(id: EcosystemId) -> Box<dyn traits::EcosystemPlugin> {
    match id {
        EcosystemId::Node => Box::new(node::NodePlugin),
        EcosystemId::Rust => Box::new(rust::RustPlugin),
    }
}

/// First ecosystem whose manifest exists in `dir`. Node wins when a directory
/// carries both manifests.
pub fn detect(dir: &Path) -> Option<(EcosystemId, std::path::PathBuf)> {
    [EcosystemId::Node, EcosystemId::Rust]
        .into_iter()
        .find_map(|id| {
            plugin_for(id)
                .file_patterns()
                .iter()
                .map(|pattern| dir.join(pattern))
                .find(|path| path.is_file())
                .map(|path| (id, path))
        })
}
