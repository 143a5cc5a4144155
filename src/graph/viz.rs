use console::Style;

use crate::core::package::DependencyKind;
use crate::graph::{EdgeRef, NodeId, NodeRef, PackagesGraph};

pub fn render_tree(roots: &[NodeRef<'_, '_>], kinds: &[DependencyKind], colors: bool) -> String {
    let mut out = String::new();
    for (idx, root) in roots.iter().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(&paint(root.name(), Style::new().bold(), colors));
        out.push_str(&paint(
            &format!("@{}", root.package().version),
            Style::new().dim(),
            colors,
        ));
        if root.outgoing_edges().next().is_none() {
            out.push_str(&paint(" (no dependencies)", Style::new().dim(), colors));
        }
        out.push('\n');
        let mut path = vec![root.id()];
        render_tree_children(root, kinds, colors, "", &mut path, &mut out);
    }
    out
}

pub fn render_dot(graph: &PackagesGraph<'_>, kinds: &[DependencyKind]) -> String {
    let mut out = String::from("digraph monograph {\n");
    for node in graph.nodes() {
        let label = format!("{}@{}", node.name(), node.package().version);
        out.push_str(&format!(
            "  \"{}\" [label=\"{}\"];\n",
            escape_dot_label(node.name()),
            escape_dot_label(&label)
        ));
    }
    for edge in graph.edges() {
        let Ok(kind) = edge.dominant_kind() else {
            continue;
        };
        if !kinds.contains(&kind) {
            continue;
        }
        let mut attrs = vec![format!("label=\"{}\"", kind)];
        if kind != DependencyKind::Normal {
            attrs.push("style=dashed".to_string());
        }
        if edge.is_cyclic() {
            attrs.push("color=red".to_string());
        }
        out.push_str(&format!(
            "  \"{}\" -> \"{}\" [{}];\n",
            escape_dot_label(edge.origin().name()),
            escape_dot_label(edge.destination().name()),
            attrs.join(", ")
        ));
    }
    out.push_str("}\n");
    out
}

fn render_tree_children(
    node: &NodeRef<'_, '_>,
    kinds: &[DependencyKind],
    colors: bool,
    prefix: &str,
    path: &mut Vec<NodeId>,
    out: &mut String,
) {
    let children: Vec<(EdgeRef<'_, '_>, DependencyKind)> = node
        .outgoing_edges()
        .filter_map(|edge| {
            let kind = edge.dominant_kind().ok()?;
            kinds.contains(&kind).then_some((edge, kind))
        })
        .collect();

    for (idx, (edge, kind)) in children.iter().enumerate() {
        let is_last = idx + 1 == children.len();
        let child = edge.destination();
        out.push_str(prefix);
        out.push_str(if is_last { "`-- " } else { "|-- " });
        out.push_str(&paint(child.name(), kind_style(*kind), colors));
        out.push_str(&paint(
            &format!("@{}", edge.version_range()),
            Style::new().dim(),
            colors,
        ));
        if *kind != DependencyKind::Normal {
            out.push_str(&paint(&format!(" ({kind})"), kind_style(*kind), colors));
        }
        if edge.is_cyclic() {
            out.push_str(&paint(" (cyclic)", Style::new().red().bold(), colors));
            out.push('\n');
            continue;
        }
        if path.contains(&child.id()) {
            out.push_str(&paint(" ...", Style::new().dim(), colors));
            out.push('\n');
            continue;
        }
        out.push('\n');
        path.push(child.id());
        let mut next_prefix = prefix.to_string();
        if is_last {
            next_prefix.push_str("    ");
        } else {
            next_prefix.push_str("|   ");
        }
        render_tree_children(&child, kinds, colors, &next_prefix, path, out);
        path.pop();
    }
}

fn kind_style(kind: DependencyKind) -> Style {
    match kind {
        DependencyKind::Normal => Style::new().green(),
        DependencyKind::Dev => Style::new().yellow(),
        DependencyKind::Peer => Style::new().cyan(),
        DependencyKind::Optional => Style::new().magenta(),
    }
}

fn paint(text: &str, style: Style, colors: bool) -> String {
    if colors {
        style.force_styling(true).apply_to(text).to_string()
    } else {
        text.to_string()
    }
}

fn escape_dot_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
