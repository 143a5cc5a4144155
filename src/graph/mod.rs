use indexmap::IndexMap;
use petgraph::graph::{DiGraph, EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::{Dfs, EdgeFiltered, EdgeRef as _, Reversed, Walker};
use petgraph::Direction;
use thiserror::Error;

use crate::core::package::{DependencyKind, Package};

pub mod builder;
pub mod constraint;
pub mod edge;
pub mod node;
pub mod viz;

pub use builder::GraphBuilder;
pub use edge::{EdgeRef, GraphEdge};
pub use node::{GraphNode, NodeRef};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("edge {origin} -> {destination} has no dependency kind")]
    MissingDominantKind { origin: String, destination: String },
    #[error("unknown package {0}")]
    UnknownPackage(String),
    #[error("unknown dependency kind '{0}'")]
    UnknownKind(String),
}

pub type NodeId = NodeIndex;
pub type EdgeId = EdgeIndex;

/// Graph of workspace packages on top of a petgraph `DiGraph`. Node and
/// edge indices follow insertion order, and nodes are also indexed by
/// package name.
#[derive(Debug, Default)]
pub struct PackagesGraph<'a> {
    graph: DiGraph<GraphNode<'a>, GraphEdge>,
    index: IndexMap<String, NodeId>,
}

impl<'a> PackagesGraph<'a> {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            index: IndexMap::new(),
        }
    }

    pub fn build(packages: &'a [Package]) -> Self {
        GraphBuilder::new().build(packages)
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn get_node(&self, name: &str) -> Option<NodeRef<'_, 'a>> {
        self.node_id(name).map(|id| NodeRef::new(self, id))
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_, 'a> {
        NodeRef::new(self, id)
    }

    pub fn edge(&self, id: EdgeId) -> EdgeRef<'_, 'a> {
        EdgeRef::new(self, id)
    }

    /// All nodes in package-list order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'_, 'a>> + '_ {
        self.graph
            .node_indices()
            .map(move |id| NodeRef::new(self, id))
    }

    /// All edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, 'a>> + '_ {
        self.graph
            .edge_indices()
            .map(move |id| EdgeRef::new(self, id))
    }

    /// Nodes that nothing in the graph depends on (depth 0).
    pub fn origin_nodes(&self) -> Vec<NodeRef<'_, 'a>> {
        self.nodes().filter(|node| node.depth() == 0).collect()
    }

    pub fn cyclic_edges(&self) -> Vec<EdgeRef<'_, 'a>> {
        self.edges().filter(|edge| edge.is_cyclic()).collect()
    }

    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.graph.node_indices().collect()
    }

    pub(crate) fn node_data(&self, id: NodeId) -> &GraphNode<'a> {
        &self.graph[id]
    }

    pub(crate) fn edge_data(&self, id: EdgeId) -> &GraphEdge {
        &self.graph[id]
    }

    pub(crate) fn edge_data_mut(&mut self, id: EdgeId) -> &mut GraphEdge {
        &mut self.graph[id]
    }

    /// `(origin, destination)` of an edge.
    pub(crate) fn endpoints(&self, id: EdgeId) -> (NodeId, NodeId) {
        let edge = &self.graph.raw_edges()[id.index()];
        (edge.source(), edge.target())
    }

    pub(crate) fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    /// Returns `None` when a node with this name already exists.
    pub(crate) fn insert_node(&mut self, package: &'a Package) -> Option<NodeId> {
        if self.index.contains_key(&package.name) {
            return None;
        }
        let id = self.graph.add_node(GraphNode::new(package));
        self.index.insert(package.name.clone(), id);
        Some(id)
    }

    pub(crate) fn add_edge(&mut self, origin: NodeId, destination: NodeId, edge: GraphEdge) -> EdgeId {
        self.graph.add_edge(origin, destination, edge)
    }

    pub(crate) fn edge_between(&self, origin: NodeId, destination: NodeId) -> Option<EdgeId> {
        self.graph.find_edge(origin, destination)
    }

    /// Edges touching `node` in `direction`, in creation order. petgraph
    /// walks adjacency lists newest first.
    pub(crate) fn edge_ids(&self, node: NodeId, direction: Direction) -> Vec<EdgeId> {
        let mut ids: Vec<EdgeId> = self
            .graph
            .edges_directed(node, direction)
            .map(|edge| edge.id())
            .collect();
        ids.sort();
        ids
    }

    /// Nodes reachable from `start` over non-cyclic edges whose dominant
    /// kind is in `kinds`, in depth-first discovery order. `start` itself is
    /// not included.
    pub(crate) fn reachable(&self, start: NodeId, kinds: &[DependencyKind], direction: Direction) -> Vec<NodeId> {
        let filtered = EdgeFiltered::from_fn(&self.graph, |edge: EdgeReference<'_, GraphEdge>| {
            edge.weight().follows(kinds)
        });
        let order: Vec<NodeId> = match direction {
            Direction::Outgoing => Dfs::new(&filtered, start).iter(&filtered).collect(),
            Direction::Incoming => {
                let reversed = Reversed(&filtered);
                Dfs::new(reversed, start).iter(reversed).collect()
            }
        };
        order.into_iter().filter(|id| *id != start).collect()
    }

    /// Raises `node` to at least `depth` and pushes the increase down every
    /// non-cyclic outgoing edge. Depth never decreases.
    pub(crate) fn raise_depth(&mut self, node: NodeId, depth: usize) {
        let mut pending = vec![(node, depth)];
        while let Some((current, depth)) = pending.pop() {
            let data = &mut self.graph[current];
            if data.depth >= depth {
                continue;
            }
            data.depth = depth;
            pending.extend(
                self.graph
                    .edges_directed(current, Direction::Outgoing)
                    .filter(|edge| !edge.weight().is_cyclic)
                    .map(|edge| (edge.target(), depth + 1)),
            );
        }
    }
}
