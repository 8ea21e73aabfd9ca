//! Integration tests for the `opdi` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and error
//! exit codes run without a device; the status tests stand up a mock
//! device with wiremock.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `opdi` binary with env isolation.
///
/// Clears all `OPDI_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn opdi_cmd(config: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("opdi");
    cmd.env("HOME", "/tmp/opdi-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/opdi-cli-test-nonexistent")
        .env("OPDI_CONFIG", config)
        .env_remove("OPDI_DEVICE")
        .env_remove("OPDI_URL")
        .env_remove("OPDI_OUTPUT")
        .env_remove("OPDI_TIMEOUT")
        .env_remove("OPDI_PSK")
        .env_remove("RUST_LOG");
    cmd
}

fn missing_config() -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    (dir, path)
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, cfg) = missing_config();
    let output = opdi_cmd(&cfg).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_flag() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg).arg("--help").assert().success().stdout(
        predicate::str::contains("OPDI")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("profiles"))
            .and(predicate::str::contains("camera")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("opdi"));
}

#[test]
fn test_completions_zsh() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_dir, cfg) = missing_config();
    let output = opdi_cmd(&cfg).arg("foobar").output().unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("foobar"));
}

#[test]
fn test_status_without_device() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No device configured"));
}

#[test]
fn test_unknown_device_lists_configured_ones() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    std::fs::write(
        &cfg,
        "[devices.bench]\nurl = \"http://192.168.4.1\"\n",
    )
    .unwrap();

    opdi_cmd(&cfg)
        .args(["--device", "garage", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("garage").and(predicate::str::contains("bench")));
}

#[test]
fn test_bad_ap_channel_is_usage_error() {
    let (_dir, cfg) = missing_config();
    let output = opdi_cmd(&cfg)
        .args(["--url", "http://127.0.0.1:9", "ap", "set", "--channel", "14"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("channel"));
}

#[test]
fn test_watch_rejects_zero_interval() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .args(["--url", "http://127.0.0.1:9", "watch", "--interval-ms", "0"])
        .assert()
        .code(2);
}

#[test]
fn test_unreachable_device_is_connection_error() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .args(["--url", "http://127.0.0.1:9", "--timeout", "2", "status"])
        .assert()
        .code(predicate::in_iter([7, 8]));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_override() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_use_switches_default() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    std::fs::write(
        &cfg,
        "default_device = \"bench\"\n\n\
         [devices.bench]\nurl = \"http://192.168.4.1\"\n\n\
         [devices.lab]\nurl = \"http://10.0.0.9\"\n",
    )
    .unwrap();

    opdi_cmd(&cfg).args(["config", "use", "lab"]).assert().success();

    opdi_cmd(&cfg)
        .args(["config", "devices"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lab *").and(predicate::str::contains("bench\n")));
}

#[test]
fn test_config_show_emits_valid_toml_for_awkward_names() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("config.toml");
    std::fs::write(
        &cfg,
        "[devices.\"my lab\"]\nurl = \"http://10.0.0.9\"\nca_cert = '/certs/\"lab\".pem'\n",
    )
    .unwrap();

    opdi_cmd(&cfg)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("[devices.\"my lab\"]")
                .and(predicate::str::contains(r#"/certs/"lab".pem"#)),
        );
}

#[test]
fn test_config_use_unknown_device() {
    let (_dir, cfg) = missing_config();
    opdi_cmd(&cfg)
        .args(["config", "use", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere"));
}

// ── Against a mock device ───────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_from_device() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/net/sta/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "state": "STA_CONNECTED",
            "ip": "192.168.1.23",
            "gw": "192.168.1.1",
            "rssi": -58
        })))
        .mount(&server)
        .await;

    let (_dir, cfg) = missing_config();
    let url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        opdi_cmd(&cfg)
            .args(["--url", &url, "--output", "json-compact", "status"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["mode"], "sta_connected");
    assert_eq!(body["ip"], "192.168.1.23");
    assert_eq!(body["gateway"], "192.168.1.1");
    assert_eq!(body["rssi"], -58);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_command_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/net/sta/connect"))
        .respond_with(ResponseTemplate::new(500).set_body_string("busy"))
        .mount(&server)
        .await;

    let (_dir, cfg) = missing_config();
    let url = server.uri();
    let output = tokio::task::spawn_blocking(move || {
        opdi_cmd(&cfg)
            .args(["--url", &url, "connect", "HomeNet"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
}
