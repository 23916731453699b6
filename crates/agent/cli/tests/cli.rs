//! Integration tests for the agent-config binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const AGENT_CONF: &str = r#"
servers = influx-1:9000, influx-2
database = jvm
password = hunter2
unit = count

java.lang:type=Memory :: HeapMemoryUsage {
    unit = bytes
    name = heap
}
"#;

fn config_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

fn agent_config() -> Command {
    let mut cmd = Command::cargo_bin("agent-config").unwrap();
    cmd.env_remove("RUST_LOG").env_remove("AGENT_LOG_LEVEL");
    cmd
}

#[test]
fn check_prints_summary() {
    let file = config_file(AGENT_CONF);
    agent_config()
        .arg("check")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("influx-1:9000, influx-2:8086"))
        .stdout(predicate::str::contains("Matchers:  1"));
}

#[test]
fn check_fails_on_missing_database() {
    let file = config_file("servers = localhost\n");
    agent_config()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("database"));
}

#[test]
fn check_fails_on_syntax_error() {
    let file = config_file("servers = localhost\ndatabase = jvm\njava.lang:* {\n");
    agent_config()
        .arg("check")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 3"));
}

#[test]
fn resolve_prints_key_value_lines() {
    let file = config_file(AGENT_CONF);
    agent_config()
        .arg("resolve")
        .arg(file.path())
        .args(["--object-name", "java.lang:type=Memory", "--attribute", "HeapMemoryUsage"])
        .assert()
        .success()
        .stdout(predicate::str::contains("unit=bytes"))
        .stdout(predicate::str::contains("name=heap"))
        .stdout(predicate::str::contains("hunter2").not());
}

#[test]
fn resolve_json_falls_back_to_globals() {
    let file = config_file(AGENT_CONF);
    let out = agent_config()
        .arg("resolve")
        .arg(file.path())
        .args(["-o", "java.lang:type=Memory", "-a", "NonHeapMemoryUsage", "--output", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["unit"], "count");
    assert_eq!(json["database"], "jvm");
    assert!(json.get("name").is_none());
}

#[test]
fn load_error_is_reported_once() {
    let file = config_file("servers = localhost\n");
    let out = agent_config().arg("check").arg(file.path()).output().unwrap();
    assert!(!out.status.success());

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr.matches("Missing required key: database").count(), 1);
}

#[test]
fn resolve_rejects_bad_object_name() {
    let file = config_file(AGENT_CONF);
    agent_config()
        .arg("resolve")
        .arg(file.path())
        .args(["--object-name", "no-domain-separator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid object name"));
}

#[test]
fn dump_omits_password() {
    let file = config_file(AGENT_CONF);
    let out = agent_config().arg("dump").arg(file.path()).output().unwrap();
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["settings"]["database"], "jvm");
    assert!(json["settings"].get("password").is_none());
    assert_eq!(
        json["matchers"][0]["pattern"],
        "java.lang:type=Memory :: HeapMemoryUsage"
    );
}

#[test]
fn logs_go_to_configured_file() {
    let log = NamedTempFile::new().unwrap();
    let text = format!(
        "servers = localhost\ndatabase = jvm\nlog.level = FINE\nlog.path = {}\n",
        log.path().display()
    );
    let file = config_file(&text);

    agent_config().arg("check").arg(file.path()).assert().success();

    let logged = std::fs::read_to_string(log.path()).unwrap();
    assert!(logged.contains("Configuration loaded"));
}
