use std::collections::HashSet;

use tracing::{debug, error, trace, warn};

use crate::config::GraphSettings;
use crate::core::package::{DependencyKind, Package};
use crate::graph::{GraphEdge, NodeId, PackagesGraph};

/// Builds a [`PackagesGraph`] from a package list with a depth-first walk.
///
/// Cycle detection is path-sensitive: an edge is cyclic only when its
/// destination is on the current resolution path. Each recursive call gets
/// its own copy of that path, so sibling subtrees never see each other's
/// nodes. The path includes the node being resolved, which makes a package
/// that depends on itself a cyclic edge rather than a self-loop the walk
/// would follow forever.
///
/// Every new edge raises its destination's depth to at least one more than
/// its origin's, cyclic edges included. Packages that only sit on a cycle
/// therefore never end up at depth 0.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    kinds: Vec<DependencyKind>,
    cycle_warning_kinds: Vec<DependencyKind>,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            kinds: DependencyKind::ALL.to_vec(),
            cycle_warning_kinds: vec![DependencyKind::Normal, DependencyKind::Dev],
        }
    }

    pub fn from_settings(settings: &GraphSettings) -> Self {
        Self {
            kinds: settings.kinds.clone(),
            cycle_warning_kinds: settings.cycle_warning_kinds.clone(),
        }
    }

    /// Declared dependency kinds that become edges.
    pub fn kinds(mut self, kinds: &[DependencyKind]) -> Self {
        self.kinds = kinds.to_vec();
        self
    }

    pub fn build<'a>(&self, packages: &'a [Package]) -> PackagesGraph<'a> {
        let mut graph = PackagesGraph::new();

        // Every node exists before any edge is resolved.
        for package in packages {
            if graph.insert_node(package).is_none() {
                warn!(package = %package.name, "duplicate package name, keeping the first one");
            }
        }

        for node in graph.node_ids() {
            self.resolve(&mut graph, node, &HashSet::new());
        }

        debug!(
            nodes = graph.len(),
            edges = graph.edge_count(),
            cyclic = graph.cyclic_edges().len(),
            "built packages graph"
        );
        graph
    }

    fn resolve(&self, graph: &mut PackagesGraph<'_>, node: NodeId, ancestors: &HashSet<NodeId>) {
        let mut path = ancestors.clone();
        path.insert(node);

        let package = graph.node_data(node).package();
        for dependency in package.dependencies_of_kinds(&self.kinds) {
            let Some(destination) = graph.node_id(&dependency.name) else {
                trace!(
                    package = %package.name,
                    dependency = %dependency.name,
                    "skipping dependency outside the graph"
                );
                continue;
            };

            // Existing edges were fully explored when they were created.
            if let Some(existing) = graph.edge_between(node, destination) {
                graph.edge_data_mut(existing).add_kind(dependency.kind);
                continue;
            }

            let mut edge = GraphEdge::new(dependency.version_range.clone());
            edge.add_kind(dependency.kind);
            edge.is_cyclic = path.contains(&destination);
            let is_cyclic = edge.is_cyclic;
            graph.add_edge(node, destination, edge);

            let depth = graph.node_data(node).depth() + 1;
            graph.raise_depth(destination, depth);

            if is_cyclic {
                self.report_cycle(&package.name, &dependency.name, dependency.kind);
                continue;
            }

            self.resolve(graph, destination, &path);
        }
    }

    fn report_cycle(&self, origin: &str, destination: &str, kind: DependencyKind) {
        if self.cycle_warning_kinds.contains(&kind) {
            error!(
                origin = %origin,
                destination = %destination,
                kind = %kind,
                "cyclic dependency detected: {origin} -> {destination}"
            );
        } else {
            debug!(
                origin = %origin,
                destination = %destination,
                kind = %kind,
                "cyclic {kind} dependency: {origin} -> {destination}"
            );
        }
    }
}
