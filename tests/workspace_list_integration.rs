use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

struct TestWorkspace {
    root: PathBuf,
}

impl TestWorkspace {
    fn new() -> Self {
        let root = unique_temp_dir("workspace-list");
        fs::create_dir_all(root.join(".monograph")).expect("create .monograph");
        fs::write(
            root.join(".monograph").join("config.toml"),
            r#"[workspace]
name = "workspace-list-integration"
packages = ["crates/*", "packages/*"]

[packages."scratch"]
ignored = true
"#,
        )
        .expect("write workspace config");

        write_file(
            &root.join("crates/engine/Cargo.toml"),
            "[package]\nname = \"engine\"\nversion = \"0.4.0\"\n\n[dependencies]\nproto = { path = \"../proto\" }\n\n[dev-dependencies]\nharness = { path = \"../harness\" }\n",
        );
        write_file(
            &root.join("crates/proto/Cargo.toml"),
            "[package]\nname = \"proto\"\nversion = \"0.2.1\"\n",
        );
        write_file(
            &root.join("crates/harness/Cargo.toml"),
            "[package]\nname = \"harness\"\nversion = \"0.1.0\"\n\n[dependencies]\nproto = \"0.2\"\n",
        );
        write_file(
            &root.join("packages/scratch/package.json"),
            r#"{ "name": "scratch", "version": "0.0.1", "dependencies": { "engine": "*" } }"#,
        );
        write_file(
            &root.join("packages/web/package.json"),
            r#"{ "name": "web", "version": "3.0.0" }"#,
        );

        Self { root }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(monograph_bin());
        cmd.arg("--no-color")
            .env_remove("RUST_LOG")
            .env_remove("MONOGRAPH_WORKSPACE")
            .env_remove("MONOGRAPH_CONFIG")
            .env_remove("MONOGRAPH_PACKAGES");
        cmd
    }

    fn list_json(&self, output: Output) -> Vec<serde_json::Value> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        assert!(
            output.status.success(),
            "list failed\nstdout:\n{stdout}\nstderr:\n{stderr}"
        );
        serde_json::from_str(&stdout).expect("parse list json")
    }
}

impl Drop for TestWorkspace {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
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

fn names(rows: &[serde_json::Value]) -> Vec<&str> {
    rows.iter()
        .map(|row| row["name"].as_str().expect("name"))
        .collect()
}

#[test]
fn list_reports_packages_with_depth_and_path() {
    let workspace = TestWorkspace::new();
    let output = workspace
        .command()
        .arg("--workspace")
        .arg(&workspace.root)
        .args(["list", "--json"])
        .output()
        .expect("run monograph list");
    let rows = workspace.list_json(output);

    assert_eq!(names(&rows), vec!["engine", "harness", "proto", "web"]);
    let proto = &rows[2];
    assert_eq!(proto["version"], "0.2.1");
    assert_eq!(proto["depth"], 2);
    assert_eq!(proto["path"], Path::new("crates").join("proto").display().to_string());
    assert_eq!(rows[0]["depth"], 0);
    assert_eq!(rows[3]["depth"], 0);
}

#[test]
fn workspace_is_discovered_from_nested_directory() {
    let workspace = TestWorkspace::new();
    let output = workspace
        .command()
        .current_dir(workspace.root.join("crates").join("engine"))
        .args(["list", "--json"])
        .output()
        .expect("run monograph list");
    let rows = workspace.list_json(output);
    assert_eq!(rows.len(), 4);
}

#[test]
fn package_patterns_can_be_overridden_from_env() {
    let workspace = TestWorkspace::new();
    let output = workspace
        .command()
        .arg("--workspace")
        .arg(&workspace.root)
        .env("MONOGRAPH_PACKAGES", "packages/*")
        .args(["list", "--json"])
        .output()
        .expect("run monograph list");
    let rows = workspace.list_json(output);
    assert_eq!(names(&rows), vec!["web"]);
}

#[test]
fn workspace_env_points_at_root() {
    let workspace = TestWorkspace::new();
    let output = workspace
        .command()
        .current_dir(std::env::temp_dir())
        .env("MONOGRAPH_WORKSPACE", &workspace.root)
        .args(["list", "--json"])
        .output()
        .expect("run monograph list");
    let rows = workspace.list_json(output);
    assert_eq!(rows.len(), 4);
}

#[test]
fn duplicate_package_names_fail() {
    let workspace = TestWorkspace::new();
    write_file(
        &workspace.root.join("packages/web-copy/package.json"),
        r#"{ "name": "web", "version": "3.0.1" }"#,
    );
    let output = workspace
        .command()
        .arg("--workspace")
        .arg(&workspace.root)
        .arg("list")
        .output()
        .expect("run monograph list");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("package web is declared twice"), "stderr:\n{stderr}");
}

#[test]
fn missing_workspace_is_reported() {
    let workspace = TestWorkspace::new();
    let missing = workspace.root.join("does-not-exist");
    let output = workspace
        .command()
        .arg("--workspace")
        .arg(&missing)
        .arg("list")
        .output()
        .expect("run monograph list");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid workspace root"), "stderr:\n{stderr}");
}
