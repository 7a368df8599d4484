//! Configuration integration tests.
//!
//! These tests verify config discovery, format parsing, and precedence
//! from an end-to-end perspective using the compiled binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Returns a Command configured to run our binary with the default
/// branch as the only source.
#[allow(deprecated)]
fn cmd(sandbox: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("VERCEL_GIT_COMMIT_REF")
        .env_remove("RUST_LOG")
        .env_remove("DOCREF_LOG_PATH")
        .env("GIT_DIR", sandbox.path().join("no-such-git-dir"))
        .env("DOCREF_LOG_DIR", sandbox.path().join("logs"))
        .env("XDG_CONFIG_HOME", sandbox.path().join("xdg"));
    cmd
}

fn chdir(tmp: &TempDir) -> [&str; 2] {
    ["-C", tmp.path().to_str().unwrap()]
}

// =============================================================================
// Config File Discovery
// =============================================================================

#[test]
fn runs_without_config_file() {
    let tmp = TempDir::new().unwrap();
    cmd(&tmp).args(chdir(&tmp)).arg("info").assert().success();
}

#[test]
fn discovers_dotfile_config_in_current_dir() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.toml"),
        "[branch]\ndefault = \"stable\"\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("branch")
        .assert()
        .success()
        .stdout("stable\n");
}

#[test]
fn discovers_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("docs").join("pages");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        tmp.path().join("docref.toml"),
        "[branch]\ndefault = \"trunk\"\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(["-C", nested.to_str().unwrap(), "branch"])
        .assert()
        .success()
        .stdout("trunk\n");
}

#[test]
fn dotfile_takes_precedence_over_regular_name() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.toml"),
        "[branch]\ndefault = \"dot\"\n",
    )
    .unwrap();
    fs::write(
        tmp.path().join("docref.toml"),
        "[branch]\ndefault = \"plain\"\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("branch")
        .assert()
        .success()
        .stdout("dot\n");
}

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.toml"),
        "[branch]\ndefault = \"discovered\"\n",
    )
    .unwrap();
    let explicit = tmp.path().join("ci.toml");
    fs::write(&explicit, "[branch]\ndefault = \"explicit\"\n").unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .args(["--config", explicit.to_str().unwrap(), "branch"])
        .assert()
        .success()
        .stdout("explicit\n");
}

#[test]
fn info_reports_explicit_config_file() {
    let tmp = TempDir::new().unwrap();
    let explicit = tmp.path().join("custom.toml");
    fs::write(&explicit, "[branch]\ndefault = \"trunk\"\n").unwrap();

    let output = cmd(&tmp)
        .args(chdir(&tmp))
        .args(["--config", explicit.to_str().unwrap(), "--json", "info"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["config"]["default_branch"], "trunk");
    assert_eq!(json["config"]["config_files"][0], explicit.to_str().unwrap());
    assert_eq!(json["site"]["branch"]["name"], "trunk");
}

#[cfg(target_os = "linux")]
#[test]
fn info_reports_user_and_project_config_in_order() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("site");
    let user_dir = tmp.path().join("xdg").join("docref");
    fs::create_dir_all(&project).unwrap();
    fs::create_dir_all(&user_dir).unwrap();
    fs::write(user_dir.join("config.toml"), r#"log_level = "warn""#).unwrap();
    fs::write(
        project.join(".docref.toml"),
        "[branch]\ndefault = \"dot\"\n",
    )
    .unwrap();

    let output = cmd(&tmp)
        .args(["-C", project.to_str().unwrap(), "info", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let files = json["config"]["config_files"].as_array().expect("config_files list");
    assert_eq!(files.len(), 2);
    assert!(files[0].as_str().unwrap().ends_with("xdg/docref/config.toml"));
    assert!(files[1].as_str().unwrap().ends_with("site/.docref.toml"));
    assert_eq!(json["config"]["log_level"], "warn");
    assert_eq!(json["site"]["branch"]["name"], "dot");
}

#[test]
fn doctor_reports_explicit_config_file() {
    let tmp = TempDir::new().unwrap();
    let explicit = tmp.path().join("custom.toml");
    fs::write(&explicit, "[branch]\ndefault = \"trunk\"\n").unwrap();

    let output = cmd(&tmp)
        .args(chdir(&tmp))
        .args(["--config", explicit.to_str().unwrap(), "doctor", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout);
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(json["config"]["found"], true);
    assert_eq!(json["config"]["files"][0], explicit.to_str().unwrap());
}

#[test]
fn doctor_text_lists_explicit_config_file() {
    let tmp = TempDir::new().unwrap();
    let explicit = tmp.path().join("custom.toml");
    fs::write(&explicit, "[branch]\ndefault = \"trunk\"\n").unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .args(["--config", explicit.to_str().unwrap(), "--color", "never", "doctor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Config file:"))
        .stdout(predicate::str::contains("custom.toml"))
        .stdout(predicate::str::contains("No config file found").not());
}

// =============================================================================
// Config Format Parsing
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.yaml"),
        "package:\n  version: \"3.1.4\"\n  export_var: DOCS_RANGE\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("DOCS_RANGE=3.1.x"));
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.json"),
        r#"{"branch": {"export_var": "DOCS_REF"}}"#,
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("env")
        .assert()
        .success()
        .stdout("DOCS_REF=main\n");
}

#[test]
fn manifest_path_is_relative_to_project() {
    let tmp = TempDir::new().unwrap();
    let pkg = tmp.path().join("packages").join("core");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("package.json"), r#"{"version": "0.19.2"}"#).unwrap();
    fs::write(
        tmp.path().join(".docref.toml"),
        "[package]\nmanifest = \"packages/core/package.json\"\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("VITE_DOCS_VERSION_RANGE=0.19.x"));
}

// =============================================================================
// Invalid Config
// =============================================================================

#[test]
fn invalid_toml_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".docref.toml"), "log_level = [").unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("branch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn unknown_log_level_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".docref.toml"), r#"log_level = "chatty""#).unwrap();

    cmd(&tmp).args(chdir(&tmp)).arg("branch").assert().failure();
}

#[test]
fn empty_export_var_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".docref.toml"),
        "[branch]\nexport_var = \"\"\n",
    )
    .unwrap();

    cmd(&tmp)
        .args(chdir(&tmp))
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("branch.export_var"));
}
