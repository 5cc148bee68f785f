//! Integration tests for the `melange` CLI binary.
//!
//! Argument handling and error paths run without a server; the end-to-end
//! cases point the binary at a wiremock server.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `melange` binary with env isolation.
///
/// Clears every `MELANGE_*` variable and points the config directory at a
/// nonexistent path so tests never read the user's configuration.
fn melange_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("melange");
    cmd.env("HOME", "/tmp/melange-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/melange-cli-test-nonexistent")
        .env_remove("RUST_LOG");
    for var in [
        "MELANGE_HOST",
        "MELANGE_PORT",
        "MELANGE_TENANT_ID",
        "MELANGE_AUTH_URL",
        "MELANGE_USERNAME",
        "MELANGE_API_KEY",
        "MELANGE_AUTH_TOKEN",
        "MELANGE_TIMEOUT",
        "MELANGE_USE_SSL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn server_cmd(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = melange_cmd();
    cmd.args(["--host", "127.0.0.1", "--port", &server.address().port().to_string()]);
    cmd
}

// ── Help and discovery ──────────────────────────────────────────────

#[test]
fn test_help_flag() {
    melange_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("RESOURCE").and(predicate::str::contains("--tenant")));
}

#[test]
fn test_no_resource_lists_resources() {
    melange_cmd().assert().success().stdout(
        predicate::str::contains("ip_block")
            .and(predicate::str::contains("unusable_ip_range"))
            .and(predicate::str::contains("allowed_ip")),
    );
}

#[test]
fn test_resource_without_operation_lists_operations() {
    melange_cmd().arg("policy").assert().success().stdout(
        predicate::str::contains("policy create name=<name> [desc=<desc>]")
            .and(predicate::str::contains("policy update id=<id> name=<name> [desc=<desc>]")),
    );
}

// ── Usage errors ────────────────────────────────────────────────────

#[test]
fn test_unknown_resource_is_usage_error() {
    melange_cmd()
        .arg("bogus")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Factory has no attribute bogus"));
}

#[test]
fn test_unknown_operation_is_usage_error() {
    melange_cmd()
        .args(["-t", "123", "ip_block", "explode"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("IpBlockClient has no attribute explode"));
}

#[test]
fn test_missing_required_argument_is_usage_error() {
    melange_cmd()
        .args(["-t", "123", "ip_block", "create", "type=private"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cidr"));
}

#[test]
fn test_unexpected_argument_is_usage_error() {
    melange_cmd()
        .args(["-t", "123", "ip_block", "show", "id=1", "colour=blue"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("colour"));
}

#[test]
fn test_non_keyword_argument_is_usage_error() {
    melange_cmd()
        .args(["allowed_ip", "delete", "interface_id123", "-t", "RAX"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Action arguments should be of the form of field=value"));
}

#[test]
fn test_missing_tenant_is_usage_error() {
    melange_cmd()
        .args(["ip_block", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("tenant id"));
}

#[test]
fn test_connection_failure_exit_code() {
    melange_cmd()
        .args(["--host", "127.0.0.1", "--port", "1", "mac_address_range", "list"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Error while communicating with server"));
}

// ── End to end ──────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_create_prints_yaml_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks"))
        .and(body_json(json!({"ip_block": {"type": "private", "cidr": "10.1.1.0/29"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "ip_block": {"id": "b1", "type": "private", "cidr": "10.1.1.0/29"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    server_cmd(&server)
        .args(["-t", "123", "ip_block", "create", "type=private", "cidr=10.1.1.0/29"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ip_block:")
                .and(predicate::str::contains("id: b1"))
                .and(predicate::str::contains("cidr: 10.1.1.0/29")),
        );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_not_found_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/123/ip_blocks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"NotFound": {"message": "IpBlock Not Found"}}"#))
        .mount(&server)
        .await;

    server_cmd(&server)
        .args(["-t", "123", "ip_block", "show", "id=missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("IpBlock Not Found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_as_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/mac_address_ranges"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "mac_address_ranges": [{"id": "m1", "cidr": "BC:76:4E:20:00:00/27"}]
        })))
        .mount(&server)
        .await;

    let output = server_cmd(&server)
        .args(["-o", "json", "mac_address_range", "list"])
        .output()
        .expect("command runs");

    assert!(output.status.success());
    let printed: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json on stdout");
    assert_eq!(
        printed,
        json!({"mac_address_ranges": [{"id": "m1", "cidr": "BC:76:4E:20:00:00/27"}]})
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_response_prints_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/v0.1/ipam/interfaces/vif-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    server_cmd(&server)
        .args(["interface", "delete", "vif_id=vif-1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_server_and_tenant() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/from-file/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"policies": [{"id": "p1"}]})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("temp dir");
    let config = dir.path().join("melange.toml");
    std::fs::write(
        &config,
        format!(
            "host = \"127.0.0.1\"\nport = {}\ntenant_id = \"from-file\"\n",
            server.address().port()
        ),
    )
    .expect("config written");

    melange_cmd()
        .arg("--config")
        .arg(&config)
        .args(["policy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policies:").and(predicate::str::contains("id: p1")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_env_overrides_config_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v0.1/ipam/tenants/from-env/policies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"policies": []})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().expect("temp dir");
    let config_dir = dir.path().join("melange");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::write(config_dir.join("config.toml"), "tenant_id = \"from-file\"\n").expect("config written");

    melange_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .env("MELANGE_TENANT_ID", "from-env")
        .env("MELANGE_PORT", server.address().port().to_string())
        .env("MELANGE_HOST", "127.0.0.1")
        .args(["policy", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("policies: []"));
}
