use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestWorkspace {
    root: PathBuf,
}

impl TestWorkspace {
    fn new() -> Self {
        let root = unique_temp_dir("graph-cycles");
        fs::create_dir_all(root.join(".monograph")).expect("create .monograph");
        fs::write(
            root.join(".monograph").join("config.toml"),
            "[workspace]\nname = \"graph-cycles-integration\"\npackages = [\"packages/*\"]\n",
        )
        .expect("write workspace config");

        write_package(
            &root,
            "alpha",
            r#"{ "name": "alpha", "version": "1.0.0", "dependencies": { "beta": "^1.0.0" } }"#,
        );
        write_package(
            &root,
            "beta",
            r#"{ "name": "beta", "version": "1.2.0", "dependencies": { "alpha": "^2.0.0" } }"#,
        );
        write_package(
            &root,
            "host",
            r#"{ "name": "host", "version": "1.0.0", "peerDependencies": { "plugin": "^1.0.0" } }"#,
        );
        write_package(
            &root,
            "plugin",
            r#"{ "name": "plugin", "version": "1.0.0", "peerDependencies": { "host": "=1.0.0" } }"#,
        );

        Self { root }
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(monograph_bin())
            .arg("--workspace")
            .arg(&self.root)
            .arg("--no-color")
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("MONOGRAPH_PACKAGES")
            .output()
            .expect("run monograph")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "monograph {} failed\nstdout:\n{stdout}\nstderr:\n{stderr}",
            args.join(" ")
        );
        stdout
    }
}

impl Drop for TestWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn write_package(root: &Path, dir: &str, manifest: &str) {
    let path = root.join("packages").join(dir);
    fs::create_dir_all(&path).expect("create package dir");
    fs::write(path.join("package.json"), manifest).expect("write package.json");
}

fn monograph_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_monograph"))
}

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before unix epoch")
        .as_nanos();
    let pid = std::process::id();
    std::env::temp_dir().join(format!("monograph-{prefix}-{pid}-{nanos}"))
}

#[test]
fn default_kind_cycle_is_logged_and_marked() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["graph", "show", "alpha"]);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(
        output.status.success(),
        "graph show failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
    );

    assert_eq!(
        stdout,
        "alpha@1.0.0\n`-- beta@^1.0.0\n    `-- alpha@^2.0.0 (cyclic)\n"
    );
    assert!(
        stderr.contains("cyclic dependency detected: beta -> alpha"),
        "stderr:\n{stderr}"
    );
}

#[test]
fn peer_cycle_is_not_logged_at_default_level() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["graph", "show", "host"]);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(output.status.success(), "stderr:\n{stderr}");

    assert_eq!(
        stdout,
        "host@1.0.0\n`-- plugin@^1.0.0 (peer)\n    `-- host@=1.0.0 (peer) (cyclic)\n"
    );
    assert!(!stderr.contains("plugin -> host"), "stderr:\n{stderr}");
}

#[test]
fn packages_on_cycles_are_never_origins() {
    let workspace = TestWorkspace::new();
    let stdout = workspace.run_ok(&["graph", "show"]);
    let roots: Vec<&str> = stdout
        .lines()
        .filter(|line| !line.is_empty() && !line.starts_with(['`', '|', ' ']))
        .collect();
    // Every package sits on a cycle, so the tree falls back to all of them.
    assert_eq!(
        roots,
        vec!["alpha@1.0.0", "beta@1.2.0", "host@1.0.0", "plugin@1.0.0"]
    );
    assert!(stdout.contains("beta@1.2.0\n`-- alpha@^2.0.0 (cyclic)\n"));
    assert!(stdout.contains("`-- plugin@^1.0.0 (peer)\n"));

    let stdout = workspace.run_ok(&["graph", "show", "--format", "json"]);
    let graph: serde_json::Value = serde_json::from_str(&stdout).expect("parse graph json");
    let nodes = graph["nodes"].as_array().expect("nodes");
    assert!(nodes.iter().all(|node| node["depth"].as_u64() > Some(0)));
}

#[test]
fn cycles_command_lists_cyclic_edges() {
    let workspace = TestWorkspace::new();
    let stdout = workspace.run_ok(&["graph", "cycles"]);
    assert_eq!(stdout, "beta -> alpha [normal]\nplugin -> host [peer]\n");

    let stdout = workspace.run_ok(&["graph", "cycles", "--json"]);
    let cycles: serde_json::Value = serde_json::from_str(&stdout).expect("parse cycles json");
    let cycles = cycles.as_array().expect("array");
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["from"], "beta");
    assert_eq!(cycles[0]["to"], "alpha");
    assert_eq!(cycles[0]["cyclic"], true);
    assert_eq!(cycles[1]["dominant_kind"], "peer");
}

#[test]
fn check_reports_cycles_and_range_mismatches() {
    let workspace = TestWorkspace::new();
    let stdout = workspace.run_ok(&["graph", "check", "--fix", "--json"]);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("parse check json");

    let cycles = report["cycles"].as_array().expect("cycles");
    assert_eq!(cycles.len(), 2);
    assert_eq!(cycles[0]["warn"], true);
    assert_eq!(cycles[1]["warn"], false);

    let violations = report["violations"].as_array().expect("violations");
    let unsatisfied = violations
        .iter()
        .find(|v| v["kind"] == "unsatisfied")
        .expect("beta -> alpha is unsatisfied");
    assert_eq!(unsatisfied["from"], "beta");
    assert_eq!(unsatisfied["to"], "alpha");
    assert_eq!(unsatisfied["constraint"], "^2.0.0");
    assert_eq!(unsatisfied["actual"], "1.0.0");
    assert_eq!(
        unsatisfied["suggestion"],
        "update constraint to include 1.0.0"
    );
    assert!(violations
        .iter()
        .any(|v| v["kind"] == "exact-pin" && v["from"] == "plugin"));
}

#[test]
fn verbose_flag_surfaces_peer_cycle_diagnostics() {
    let workspace = TestWorkspace::new();
    let output = workspace.run(&["-v", "graph", "cycles"]);
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    assert!(output.status.success(), "stderr:\n{stderr}");
    assert!(stderr.contains("plugin -> host"), "stderr:\n{stderr}");
}
