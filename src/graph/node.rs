use petgraph::Direction;

use crate::core::package::{DependencyKind, Package};
use crate::graph::{EdgeRef, NodeId, PackagesGraph};

/// One package in the graph.
#[derive(Debug, Clone)]
pub struct GraphNode<'a> {
    package: &'a Package,
    pub(crate) depth: usize,
}

impl<'a> GraphNode<'a> {
    pub fn new(package: &'a Package) -> Self {
        Self { package, depth: 0 }
    }

    pub fn name(&self) -> &'a str {
        &self.package.name
    }

    pub fn package(&self) -> &'a Package {
        self.package
    }

    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Borrowed view of a node. All traversal queries hang off this type since
/// they need the edges owned by the graph.
#[derive(Clone, Copy)]
pub struct NodeRef<'g, 'a> {
    graph: &'g PackagesGraph<'a>,
    id: NodeId,
}

impl<'g, 'a> NodeRef<'g, 'a> {
    pub(crate) fn new(graph: &'g PackagesGraph<'a>, id: NodeId) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    fn data(&self) -> &'g GraphNode<'a> {
        self.graph.node_data(self.id)
    }

    pub fn name(&self) -> &'a str {
        self.data().name()
    }

    pub fn package(&self) -> &'a Package {
        self.data().package()
    }

    pub fn depth(&self) -> usize {
        self.data().depth()
    }

    /// Outgoing edges in creation order.
    pub fn outgoing_edges(&self) -> impl Iterator<Item = EdgeRef<'g, 'a>> + 'g {
        self.edges(Direction::Outgoing)
    }

    pub fn incoming_edges(&self) -> impl Iterator<Item = EdgeRef<'g, 'a>> + 'g {
        self.edges(Direction::Incoming)
    }

    fn edges(&self, direction: Direction) -> impl Iterator<Item = EdgeRef<'g, 'a>> + 'g {
        let graph = self.graph;
        graph
            .edge_ids(self.id, direction)
            .into_iter()
            .map(move |id| graph.edge(id))
    }

    pub fn outgoing_edge_for(&self, other: &NodeRef<'_, '_>) -> Option<EdgeRef<'g, 'a>> {
        self.graph
            .edge_between(self.id, other.id)
            .map(|id| self.graph.edge(id))
    }

    pub fn incoming_edge_for(&self, other: &NodeRef<'_, '_>) -> Option<EdgeRef<'g, 'a>> {
        self.graph
            .edge_between(other.id, self.id)
            .map(|id| self.graph.edge(id))
    }

    /// Direct edge check: `self` depends on `other`.
    pub fn is_dependent_of(&self, other: &NodeRef<'_, '_>) -> bool {
        self.outgoing_edge_for(other).is_some()
    }

    /// Direct edge check: `other` depends on `self`.
    pub fn is_dependency_of(&self, other: &NodeRef<'_, '_>) -> bool {
        self.incoming_edge_for(other).is_some()
    }

    /// Every edge reachable through outgoing edges whose dominant kind is in
    /// `kinds`. Cyclic edges are never followed, and each edge appears once.
    pub fn all_dependency_edges(&self, kinds: &[DependencyKind]) -> Vec<EdgeRef<'g, 'a>> {
        self.reachable_edges(kinds, Direction::Outgoing)
    }

    pub fn all_dependencies(&self, kinds: &[DependencyKind]) -> Vec<NodeRef<'g, 'a>> {
        self.reachable_nodes(kinds, Direction::Outgoing)
    }

    pub fn all_dependent_edges(&self, kinds: &[DependencyKind]) -> Vec<EdgeRef<'g, 'a>> {
        self.reachable_edges(kinds, Direction::Incoming)
    }

    pub fn all_dependents(&self, kinds: &[DependencyKind]) -> Vec<NodeRef<'g, 'a>> {
        self.reachable_nodes(kinds, Direction::Incoming)
    }

    fn reachable_nodes(&self, kinds: &[DependencyKind], direction: Direction) -> Vec<NodeRef<'g, 'a>> {
        self.graph
            .reachable(self.id, kinds, direction)
            .into_iter()
            .map(|id| self.graph.node(id))
            .collect()
    }

    // An edge is reachable when its near end is: the start node or any node
    // the walk discovered. Each edge has a single near end, so no duplicates.
    fn reachable_edges(&self, kinds: &[DependencyKind], direction: Direction) -> Vec<EdgeRef<'g, 'a>> {
        let graph = self.graph;
        std::iter::once(self.id)
            .chain(graph.reachable(self.id, kinds, direction))
            .flat_map(|id| graph.edge_ids(id, direction))
            .filter(|id| graph.edge_data(*id).follows(kinds))
            .map(|id| graph.edge(id))
            .collect()
    }
}

impl std::fmt::Debug for NodeRef<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("name", &self.name())
            .field("depth", &self.depth())
            .finish()
    }
}

impl PartialEq for NodeRef<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.graph, other.graph) && self.id == other.id
    }
}

impl Eq for NodeRef<'_, '_> {}
