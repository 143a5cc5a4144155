use crate::core::package::DependencyKind;
use crate::core::version::VersionReq;
use crate::graph::{EdgeId, GraphError, NodeRef, PackagesGraph};

/// Edge weight for a dependency of one package on another. Created at most
/// once per ordered pair; later declarations between the same pair only add
/// kinds.
#[derive(Debug, Clone)]
pub struct GraphEdge {
    version_range: VersionReq,
    kinds: Vec<DependencyKind>,
    pub(crate) is_cyclic: bool,
}

impl GraphEdge {
    pub fn new(version_range: VersionReq) -> Self {
        Self {
            version_range,
            kinds: Vec::new(),
            is_cyclic: false,
        }
    }

    pub fn version_range(&self) -> &VersionReq {
        &self.version_range
    }

    pub fn kinds(&self) -> &[DependencyKind] {
        &self.kinds
    }

    pub fn add_kind(&mut self, kind: DependencyKind) {
        if !self.kinds.contains(&kind) {
            self.kinds.push(kind);
        }
    }

    pub fn is_of_kind(&self, kind: DependencyKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn is_cyclic(&self) -> bool {
        self.is_cyclic
    }

    /// `None` only for an edge that never received a kind.
    pub fn dominant_kind(&self) -> Option<DependencyKind> {
        DependencyKind::PRECEDENCE
            .into_iter()
            .find(|kind| self.is_of_kind(*kind))
    }

    pub(crate) fn matches_kinds(&self, kinds: &[DependencyKind]) -> bool {
        self.dominant_kind()
            .map(|kind| kinds.contains(&kind))
            .unwrap_or(false)
    }

    /// Whether transitive queries walk across this edge.
    pub(crate) fn follows(&self, kinds: &[DependencyKind]) -> bool {
        !self.is_cyclic && self.matches_kinds(kinds)
    }
}

/// Borrowed view of an edge together with the graph it belongs to.
#[derive(Clone, Copy)]
pub struct EdgeRef<'g, 'a> {
    graph: &'g PackagesGraph<'a>,
    id: EdgeId,
}

impl<'g, 'a> EdgeRef<'g, 'a> {
    pub(crate) fn new(graph: &'g PackagesGraph<'a>, id: EdgeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> EdgeId {
        self.id
    }

    pub fn data(&self) -> &'g GraphEdge {
        self.graph.edge_data(self.id)
    }

    pub fn origin(&self) -> NodeRef<'g, 'a> {
        self.graph.node(self.graph.endpoints(self.id).0)
    }

    pub fn destination(&self) -> NodeRef<'g, 'a> {
        self.graph.node(self.graph.endpoints(self.id).1)
    }

    pub fn version_range(&self) -> &'g VersionReq {
        self.data().version_range()
    }

    pub fn kinds(&self) -> &'g [DependencyKind] {
        self.data().kinds()
    }

    pub fn is_of_kind(&self, kind: DependencyKind) -> bool {
        self.data().is_of_kind(kind)
    }

    pub fn is_cyclic(&self) -> bool {
        self.data().is_cyclic()
    }

    pub fn dominant_kind(&self) -> Result<DependencyKind, GraphError> {
        self.data()
            .dominant_kind()
            .ok_or_else(|| GraphError::MissingDominantKind {
                origin: self.origin().name().to_string(),
                destination: self.destination().name().to_string(),
            })
    }
}

impl std::fmt::Debug for EdgeRef<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EdgeRef")
            .field("origin", &self.origin().name())
            .field("destination", &self.destination().name())
            .field("kinds", &self.kinds())
            .field("is_cyclic", &self.is_cyclic())
            .finish()
    }
}

impl PartialEq for EdgeRef<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for EdgeRef<'_, '_> {}
