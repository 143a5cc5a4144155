use std::env;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::resolve::resolve_workspace_with_overrides;
use crate::core::package::{parse_kinds, DependencyKind};
use crate::core::workspace::Workspace;
use crate::error::{MonographError, Result};
use crate::graph::constraint::{check_graph, fix_suggestion, GraphReport};
use crate::graph::{viz, EdgeRef, GraphBuilder, GraphError, NodeRef, PackagesGraph};
use crate::util::logging::init_logging;
use crate::util::output;

#[derive(Parser, Debug)]
#[command(name = "monograph")]
#[command(about = "Dependency graph of the packages in a monorepo", long_about = None)]
pub struct Cli {
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List workspace packages with their graph depth
    List(ListArgs),
    /// Inspect the dependency graph
    Graph(GraphArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    #[command(subcommand)]
    pub command: Option<GraphCommand>,
}

#[derive(Subcommand, Debug)]
pub enum GraphCommand {
    Show(GraphShowArgs),
    Deps(GraphDepsArgs),
    Dependents(GraphDependentsArgs),
    Cycles(GraphCyclesArgs),
    Check(GraphCheckArgs),
}

#[derive(Args, Debug)]
pub struct GraphShowArgs {
    /// Packages to print; defaults to every package nothing depends on
    pub packages: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<String>,
    #[arg(long, default_value = "tree")]
    pub format: String,
}

#[derive(Args, Debug)]
pub struct GraphDepsArgs {
    pub package: String,
    #[arg(short = 't', long)]
    pub transitive: bool,
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GraphDependentsArgs {
    pub package: String,
    #[arg(short = 't', long)]
    pub transitive: bool,
    #[arg(long, value_delimiter = ',')]
    pub kinds: Vec<String>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GraphCyclesArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct GraphCheckArgs {
    #[arg(long)]
    pub fix: bool,
    #[arg(long)]
    pub json: bool,
}

pub fn run() {
    let cli = Cli::parse();
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    init_logging(cli.verbose, cli.quiet, cli.no_color);

    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let colors = !cli.no_color && console::colors_enabled();
    match cli.command {
        Commands::List(args) => handle_list(args, cli.workspace, cli.config),
        Commands::Graph(args) => handle_graph(args, cli.workspace, cli.config, colors),
    }
}

fn handle_list(
    args: ListArgs,
    workspace_root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let workspace = load_workspace(workspace_root, config_path)?;
    let graph = GraphBuilder::from_settings(&workspace.config.graph).build(&workspace.packages);

    let rows: Vec<PackageJson> = graph
        .nodes()
        .map(|node| PackageJson {
            name: node.name().to_string(),
            version: node.package().version.raw.clone(),
            depth: node.depth(),
            path: relative_path(&workspace, &node),
        })
        .collect();

    if args.json {
        return print_json(&rows);
    }

    if rows.is_empty() {
        output::info("no packages found");
        return Ok(());
    }
    let width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0);
    for row in rows {
        println!(
            "{:<width$}  {:<12}  depth {}  {}",
            row.name,
            row.version,
            row.depth,
            row.path,
            width = width
        );
    }
    Ok(())
}

fn handle_graph(
    args: GraphArgs,
    workspace_root: Option<PathBuf>,
    config_path: Option<PathBuf>,
    colors: bool,
) -> Result<()> {
    let workspace = load_workspace(workspace_root, config_path)?;
    let graph = GraphBuilder::from_settings(&workspace.config.graph).build(&workspace.packages);
    let command = args.command.unwrap_or(GraphCommand::Show(GraphShowArgs {
        packages: Vec::new(),
        kinds: Vec::new(),
        format: "tree".to_string(),
    }));

    match command {
        GraphCommand::Show(show) => handle_graph_show(show, &workspace, &graph, colors),
        GraphCommand::Deps(deps) => handle_graph_deps(deps, &workspace, &graph),
        GraphCommand::Dependents(dependents) => {
            handle_graph_dependents(dependents, &workspace, &graph)
        }
        GraphCommand::Cycles(cycles) => handle_graph_cycles(cycles, &graph),
        GraphCommand::Check(check) => handle_graph_check(check, &workspace, &graph),
    }
}

fn handle_graph_show(
    args: GraphShowArgs,
    workspace: &Workspace,
    graph: &PackagesGraph<'_>,
    colors: bool,
) -> Result<()> {
    let kinds = query_kinds(&args.kinds, workspace)?;
    let roots = if args.packages.is_empty() {
        let origins = graph.origin_nodes();
        if origins.is_empty() {
            graph.nodes().collect()
        } else {
            origins
        }
    } else {
        args.packages
            .iter()
            .map(|name| find_node(graph, name))
            .collect::<Result<Vec<_>>>()?
    };

    match args.format.to_ascii_lowercase().as_str() {
        "tree" => {
            if graph.is_empty() {
                output::info("no packages found");
                return Ok(());
            }
            print!("{}", viz::render_tree(&roots, &kinds, colors));
            Ok(())
        }
        "dot" => {
            print!("{}", viz::render_dot(graph, &kinds));
            Ok(())
        }
        "json" => print_json(&graph_to_json(graph, &kinds)),
        other => Err(MonographError::Other(anyhow::anyhow!(format!(
            "unknown graph format '{}'",
            other
        )))),
    }
}

fn handle_graph_deps(
    args: GraphDepsArgs,
    workspace: &Workspace,
    graph: &PackagesGraph<'_>,
) -> Result<()> {
    let kinds = query_kinds(&args.kinds, workspace)?;
    let node = find_node(graph, &args.package)?;

    if args.transitive {
        let deps: Vec<String> = node
            .all_dependencies(&kinds)
            .into_iter()
            .map(|dep| dep.name().to_string())
            .collect();
        return print_names(&deps, args.json);
    }

    let edges: Vec<EdgeRef<'_, '_>> = direct_edges(node.outgoing_edges(), &kinds);
    let entries: Vec<DirectEdgeJson> = edges
        .iter()
        .map(|edge| DirectEdgeJson::new(edge, edge.destination()))
        .collect();
    print_direct(&entries, args.json)
}

fn handle_graph_dependents(
    args: GraphDependentsArgs,
    workspace: &Workspace,
    graph: &PackagesGraph<'_>,
) -> Result<()> {
    let kinds = query_kinds(&args.kinds, workspace)?;
    let node = find_node(graph, &args.package)?;

    if args.transitive {
        let dependents: Vec<String> = node
            .all_dependents(&kinds)
            .into_iter()
            .map(|dep| dep.name().to_string())
            .collect();
        return print_names(&dependents, args.json);
    }

    let edges: Vec<EdgeRef<'_, '_>> = direct_edges(node.incoming_edges(), &kinds);
    let entries: Vec<DirectEdgeJson> = edges
        .iter()
        .map(|edge| DirectEdgeJson::new(edge, edge.origin()))
        .collect();
    print_direct(&entries, args.json)
}

fn handle_graph_cycles(args: GraphCyclesArgs, graph: &PackagesGraph<'_>) -> Result<()> {
    let cycles: Vec<EdgeJson> = graph.cyclic_edges().iter().map(EdgeJson::from).collect();

    if args.json {
        return print_json(&cycles);
    }

    if cycles.is_empty() {
        output::info("no cycles found");
        return Ok(());
    }
    for cycle in cycles {
        println!(
            "{} -> {} [{}]",
            cycle.from,
            cycle.to,
            kinds_label(&cycle.kinds)
        );
    }
    Ok(())
}

fn handle_graph_check(
    args: GraphCheckArgs,
    workspace: &Workspace,
    graph: &PackagesGraph<'_>,
) -> Result<()> {
    let report = check_graph(graph, &workspace.config.graph.cycle_warning_kinds);

    if args.json {
        return print_json(&GraphCheckJson::new(&report, args.fix));
    }

    print_check_report(&report, args.fix);
    if !report.is_clean() {
        output::warn("graph check found issues");
    }
    Ok(())
}

fn load_workspace(
    workspace_root: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<Workspace> {
    let cwd = env::current_dir()?;
    let resolved = resolve_workspace_with_overrides(cwd, workspace_root, config_path)?;
    Workspace::load_from(resolved.root, resolved.config_path).map_err(MonographError::from)
}

fn find_node<'g, 'a>(graph: &'g PackagesGraph<'a>, name: &str) -> Result<NodeRef<'g, 'a>> {
    graph
        .get_node(name)
        .ok_or_else(|| MonographError::from(GraphError::UnknownPackage(name.to_string())))
}

fn query_kinds(values: &[String], workspace: &Workspace) -> Result<Vec<DependencyKind>> {
    if values.is_empty() {
        return Ok(workspace.config.graph.kinds.clone());
    }
    Ok(parse_kinds(values)?)
}

fn direct_edges<'g, 'a>(
    edges: impl Iterator<Item = EdgeRef<'g, 'a>>,
    kinds: &[DependencyKind],
) -> Vec<EdgeRef<'g, 'a>> {
    edges
        .filter(|edge| {
            edge.dominant_kind()
                .map(|kind| kinds.contains(&kind))
                .unwrap_or(false)
        })
        .collect()
}

fn relative_path(workspace: &Workspace, node: &NodeRef<'_, '_>) -> String {
    let path = &node.package().path;
    path.strip_prefix(&workspace.root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn kinds_label(kinds: &[DependencyKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.label())
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value)
            .map_err(|err| MonographError::Other(anyhow::Error::new(err)))?
    );
    Ok(())
}

fn print_names(names: &[String], json: bool) -> Result<()> {
    if json {
        return print_json(names);
    }
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

fn print_direct(entries: &[DirectEdgeJson], json: bool) -> Result<()> {
    if json {
        return print_json(entries);
    }
    for entry in entries {
        let mut line = format!("{}@{}", entry.name, entry.version_range);
        if entry.kind != DependencyKind::Normal {
            line.push_str(&format!(" ({})", entry.kind));
        }
        if entry.cyclic {
            line.push_str(" (cyclic)");
        }
        println!("{}", line);
    }
    Ok(())
}

fn print_check_report(report: &GraphReport, show_fixes: bool) {
    if report.cycles.is_empty() && report.violations.is_empty() {
        output::success("no graph issues found");
        return;
    }

    if !report.cycles.is_empty() {
        println!("cycles:");
        for cycle in &report.cycles {
            let severity = if cycle.warn { "error" } else { "info" };
            println!(
                "  {} -> {} [{}] ({})",
                cycle.origin,
                cycle.destination,
                kinds_label(&cycle.kinds),
                severity
            );
        }
    }

    if !report.violations.is_empty() {
        println!("constraint violations:");
        for violation in &report.violations {
            println!(
                "  {} -> {} {} (actual {}) [{}]",
                violation.origin,
                violation.destination,
                violation.constraint.raw,
                violation.actual_version.raw,
                violation.violation_type.label()
            );
            if show_fixes {
                println!("    suggestion: {}", fix_suggestion(violation));
            }
        }
    }
}

fn graph_to_json(graph: &PackagesGraph<'_>, kinds: &[DependencyKind]) -> GraphJson {
    let nodes = graph
        .nodes()
        .map(|node| NodeJson {
            name: node.name().to_string(),
            version: node.package().version.raw.clone(),
            depth: node.depth(),
        })
        .collect();
    let edges = direct_edges(graph.edges(), kinds)
        .iter()
        .map(EdgeJson::from)
        .collect();

    GraphJson { nodes, edges }
}

#[derive(Serialize)]
struct PackageJson {
    name: String,
    version: String,
    depth: usize,
    path: String,
}

#[derive(Serialize)]
struct GraphJson {
    nodes: Vec<NodeJson>,
    edges: Vec<EdgeJson>,
}

#[derive(Serialize)]
struct NodeJson {
    name: String,
    version: String,
    depth: usize,
}

#[derive(Serialize)]
struct EdgeJson {
    from: String,
    to: String,
    version_range: String,
    kinds: Vec<DependencyKind>,
    dominant_kind: Option<DependencyKind>,
    cyclic: bool,
}

impl From<&EdgeRef<'_, '_>> for EdgeJson {
    fn from(edge: &EdgeRef<'_, '_>) -> Self {
        Self {
            from: edge.origin().name().to_string(),
            to: edge.destination().name().to_string(),
            version_range: edge.version_range().raw.clone(),
            kinds: edge.kinds().to_vec(),
            dominant_kind: edge.dominant_kind().ok(),
            cyclic: edge.is_cyclic(),
        }
    }
}

#[derive(Serialize)]
struct DirectEdgeJson {
    name: String,
    version_range: String,
    kind: DependencyKind,
    cyclic: bool,
}

impl DirectEdgeJson {
    // Only built from edges that passed the dominant-kind filter.
    fn new(edge: &EdgeRef<'_, '_>, other: NodeRef<'_, '_>) -> Self {
        Self {
            name: other.name().to_string(),
            version_range: edge.version_range().raw.clone(),
            kind: edge
                .data()
                .dominant_kind()
                .unwrap_or(DependencyKind::Normal),
            cyclic: edge.is_cyclic(),
        }
    }
}

#[derive(Serialize)]
struct GraphCheckJson {
    cycles: Vec<CycleJson>,
    violations: Vec<ViolationJson>,
}

#[derive(Serialize)]
struct CycleJson {
    from: String,
    to: String,
    kinds: Vec<DependencyKind>,
    warn: bool,
}

#[derive(Serialize)]
struct ViolationJson {
    from: String,
    to: String,
    constraint: String,
    actual: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    suggestion: Option<String>,
}

impl GraphCheckJson {
    fn new(report: &GraphReport, with_fixes: bool) -> Self {
        let cycles = report
            .cycles
            .iter()
            .map(|cycle| CycleJson {
                from: cycle.origin.clone(),
                to: cycle.destination.clone(),
                kinds: cycle.kinds.clone(),
                warn: cycle.warn,
            })
            .collect();
        let violations = report
            .violations
            .iter()
            .map(|violation| ViolationJson {
                from: violation.origin.clone(),
                to: violation.destination.clone(),
                constraint: violation.constraint.raw.clone(),
                actual: violation.actual_version.raw.clone(),
                kind: violation.violation_type.label().to_string(),
                suggestion: with_fixes.then(|| fix_suggestion(violation)),
            })
            .collect();
        Self { cycles, violations }
    }
}
