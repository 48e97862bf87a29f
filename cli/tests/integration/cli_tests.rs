//! Integration tests for CLI structure and argument parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

const UUID: &str = "792c9cd6-9ece-4ebc-ff02-86eaf8bf7e73";

pub fn argoboot() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("argoboot"));
    cmd.env("NO_COLOR", "1").env_remove("UUID").env_remove("RUST_LOG");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    argoboot().assert().code(2).stderr(predicate::str::contains(
        "ephemeral Cloudflare tunnel",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    argoboot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("up"))
        .stdout(predicate::str::contains("discover"))
        .stdout(predicate::str::contains("link"));
}

#[test]
fn test_version_command_shows_version() {
    argoboot()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("argoboot "));
}

// --- link ---

#[test]
fn test_link_uses_default_credential() {
    let host = "abcde12345.trycloudflare.com";
    argoboot()
        .args(["link", "--host", host])
        .assert()
        .success()
        .stdout(format!(
            "vless://{UUID}@{host}:443?encryption=none&security=tls&type=ws&host={host}&path=%2F{UUID}#Argo-VLESS\n"
        ));
}

#[test]
fn test_link_reads_credential_from_env() {
    let uuid = "0f8e3c1a-2b4d-4e6f-8a9b-1c2d3e4f5a6b";
    argoboot()
        .env("UUID", uuid)
        .args(["link", "--host", "x.trycloudflare.com"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(format!("vless://{uuid}@x.trycloudflare.com:443?")))
        .stdout(predicate::str::contains(format!("path=%2F{uuid}#")));
}

#[test]
fn test_link_rejects_non_uuid_credential() {
    argoboot()
        .args(["link", "--host", "x.trycloudflare.com", "--uuid", "hunter2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid credential 'hunter2'"));
}

// --- up ---

#[test]
fn test_up_rejects_non_uuid_credential_before_touching_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let work = dir.path().join("work");
    argoboot()
        .args(["up", "--uuid", "not-a-uuid", "--work-dir"])
        .arg(&work)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("expected a UUID"));
    assert!(!work.exists());
}

#[test]
fn test_up_download_failure_exits_nonzero_with_url() {
    let dir = tempfile::tempdir().expect("tempdir");
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let url = format!("http://{addr}/sing-box.tar.gz");

    argoboot()
        .args(["up", "--quiet", "--download-timeout-secs", "5", "--singbox-url", &url])
        .args(["--cloudflared-url", &url])
        .arg("--work-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Download failed"))
        .stderr(predicate::str::contains(&url));
    assert!(!dir.path().join("config.json").exists());
}
