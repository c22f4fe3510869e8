//! Integration tests for the abq binary.
//!
//! These run the compiled binary and check argument handling, validation
//! messages and exit codes. None of them reaches a real server.

use assert_cmd::Command;
use predicates::prelude::*;

/// Command without ambient ABIQUO_* settings.
fn abq() -> Command {
    let mut cmd = Command::cargo_bin("abq").unwrap();
    cmd.env_remove("ABIQUO_ENDPOINT")
        .env_remove("ABIQUO_IDENTITY")
        .env_remove("ABIQUO_CREDENTIAL")
        .env_remove("RUST_LOG");
    cmd
}

// ==================== Help and Version ====================

#[test]
fn test_help_lists_commands() {
    abq()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("datacenters"))
        .stdout(predicate::str::contains("enterprises"))
        .stdout(predicate::str::contains("remote-services"))
        .stdout(predicate::str::contains("vms"))
        .stdout(predicate::str::contains("deploy"))
        .stdout(predicate::str::contains("undeploy"));
}

#[test]
fn test_version() {
    abq()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("abq"));
}

#[test]
fn test_no_command_fails() {
    abq().assert().failure();
}

// ==================== Connection Settings ====================

#[test]
fn test_missing_endpoint_error() {
    abq()
        .args(["--identity", "admin", "datacenters"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--endpoint"));
}

#[test]
fn test_missing_identity_error() {
    abq()
        .args(["--endpoint", "http://127.0.0.1:9/api", "vdcs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--identity"));
}

#[test]
fn test_endpoint_from_environment() {
    // Endpoint comes from the environment; the identity is still missing.
    abq()
        .env("ABIQUO_ENDPOINT", "http://127.0.0.1:9/api")
        .arg("vdcs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--identity"))
        .stderr(predicate::str::contains("--endpoint").not());
}

// ==================== Flag Validation ====================

#[test]
fn test_zero_poll_interval_error() {
    abq()
        .args([
            "--endpoint",
            "http://127.0.0.1:9/api",
            "--identity",
            "admin",
            "--poll-interval-ms",
            "0",
            "datacenters",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--poll-interval-ms"));
}

#[test]
fn test_zero_max_threads_error() {
    abq()
        .args([
            "--endpoint",
            "http://127.0.0.1:9/api",
            "--identity",
            "admin",
            "--max-threads",
            "0",
            "vms",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-threads"));
}

#[test]
fn test_zero_timeout_error() {
    abq()
        .args([
            "--endpoint",
            "http://127.0.0.1:9/api",
            "--identity",
            "admin",
            "--timeout-secs",
            "0",
            "vdcs",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout-secs"));
}

/// Global flags are accepted after the subcommand too.
#[test]
fn test_global_flag_after_subcommand() {
    abq()
        .args([
            "datacenters",
            "--endpoint",
            "http://127.0.0.1:9/api",
            "--identity",
            "admin",
            "--poll-interval-ms",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--poll-interval-ms"));
}

// ==================== Argument Errors ====================

#[test]
fn test_state_missing_vm_error() {
    abq()
        .args(["state", "--vdc", "1", "--vapp", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--vm"));
}

#[test]
fn test_remote_services_missing_datacenter_error() {
    abq()
        .arg("remote-services")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--datacenter"));
}

#[test]
fn test_deploy_rejects_non_numeric_id() {
    abq()
        .args(["deploy", "--vdc", "one", "--vapp", "2", "--vm", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--vdc"));
}

#[test]
fn test_unknown_command_error() {
    abq()
        .arg("reboot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reboot"));
}

// ==================== Unreachable Server ====================

#[test]
fn test_unreachable_endpoint_fails() {
    abq()
        .args([
            "--endpoint",
            "http://127.0.0.1:9/api",
            "--identity",
            "admin",
            "--credential",
            "xabiquo",
            "--timeout-secs",
            "2",
            "datacenters",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}
