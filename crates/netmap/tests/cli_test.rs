//! Integration tests for the `netmap` CLI binary.
//!
//! Argument parsing and config handling run without a backend; the
//! backend-bound commands talk to a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `netmap` binary with env isolation.
///
/// Clears all `NETMAP_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn netmap_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netmap");
    cmd.env("HOME", "/tmp/netmap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/netmap-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("NETMAP_PROFILE")
        .env_remove("NETMAP_BACKEND")
        .env_remove("NETMAP_OUTPUT")
        .env_remove("NETMAP_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the runtime so the mock server keeps serving.
async fn run(args: Vec<String>) -> std::process::Output {
    tokio::task::spawn_blocking(move || netmap_cmd().args(args).output().unwrap())
        .await
        .unwrap()
}

fn args(server: &MockServer, rest: &[&str]) -> Vec<String> {
    let mut out = vec!["--backend".to_owned(), server.uri()];
    out.extend(rest.iter().map(|s| (*s).to_owned()));
    out
}

fn sample_device(ip: &str, tags: &[&str]) -> serde_json::Value {
    json!({
        "id": format!("dev-{ip}"),
        "ip": ip,
        "mac": "AA:BB:CC:DD:EE:FF",
        "hostname": "workstation",
        "vendor": "Dell",
        "os": "Linux",
        "type": "Computer",
        "tags": tags,
        "device_status": true,
        "device_uptime": 3600.0,
        "snmp_version": null,
        "ports": []
    })
}

async fn backend_with_devices() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "devices": [
                sample_device("10.0.0.5", &["computer", "printer"]),
                sample_device("10.0.0.6", &["router"]),
            ]
        })))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = netmap_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    netmap_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("devices")
            .and(predicate::str::contains("scan"))
            .and(predicate::str::contains("promote"))
            .and(predicate::str::contains("bandwidth")),
    );
}

#[test]
fn test_version_flag() {
    netmap_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("netmap"));
}

#[test]
fn test_completions_bash() {
    netmap_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_invalid_output_format() {
    let output = netmap_cmd()
        .args(["--output", "xml", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("xml"), "Expected the bad value in output:\n{text}");
}

#[test]
fn test_invalid_ip_argument() {
    let output = netmap_cmd()
        .args(["devices", "get", "not-an-ip"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config (no backend needed) ──────────────────────────────────────

#[test]
fn test_config_path_prints_a_toml_path() {
    netmap_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults() {
    netmap_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[defaults]")
                .and(predicate::str::contains("poll_interval_ms")),
        );
}

#[test]
fn test_config_set_default_unknown_profile() {
    let output = netmap_cmd()
        .args(["config", "set-default", "lab"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let text = combined_output(&output);
    assert!(text.contains("lab"), "Expected profile name in output:\n{text}");
}

#[test]
fn test_unknown_profile_fails_before_connecting() {
    let output = netmap_cmd()
        .args(["--profile", "nope", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(combined_output(&output).contains("nope"));
}

// ── Backend-bound commands ──────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = backend_with_devices().await;

    let output = run(args(&server, &["-o", "json-compact", "devices", "list"])).await;
    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));

    let listed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ips: Vec<_> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["ip"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(ips, ["10.0.0.5", "10.0.0.6"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_plain() {
    let server = backend_with_devices().await;

    let output = run(args(&server, &["-o", "plain", "devices", "list"])).await;
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "10.0.0.5\n10.0.0.6\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_get_unknown_is_not_found() {
    let server = backend_with_devices().await;

    let output = run(args(&server, &["devices", "get", "10.0.0.99"])).await;
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("10.0.0.99"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_import_reports_count() {
    let server = backend_with_devices().await;
    Mock::given(method("POST"))
        .and(path("/api/devices/import"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "success", "imported": 2 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("network_data.json");
    std::fs::write(&file, b"[{}, {}]").unwrap();

    let output = run(args(
        &server,
        &["import", file.to_str().unwrap()],
    ))
    .await;
    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Imported 2 devices."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_export_writes_file() {
    let server = backend_with_devices().await;
    Mock::given(method("GET"))
        .and(path("/api/devices/export"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"count":2}"#))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("out").join("snapshot.json");

    let output = run(args(&server, &["export", "-f", file.to_str().unwrap()])).await;
    assert_eq!(output.status.code(), Some(0), "{}", combined_output(&output));
    assert_eq!(std::fs::read_to_string(&file).unwrap(), r#"{"count":2}"#);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_promote_ineligible_tag() {
    let server = backend_with_devices().await;

    let output = run(args(&server, &["--yes", "promote", "10.0.0.5", "printer"])).await;
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("printer"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_promote_without_yes_needs_a_terminal() {
    let server = backend_with_devices().await;

    let output = run(args(&server, &["promote", "10.0.0.5", "computer"])).await;
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[tokio::test]
async fn test_unreachable_backend_is_connection_error() {
    let output = run(vec![
        "--backend".into(),
        "http://127.0.0.1:9".into(),
        "--timeout".into(),
        "2".into(),
        "devices".into(),
        "list".into(),
    ])
    .await;
    assert_eq!(output.status.code(), Some(3));
}
