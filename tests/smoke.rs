//! Smoke tests -- run the binary against saved snapshots.

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn kubedoctor() -> Command {
    let mut cmd = Command::cargo_bin("kubedoctor").unwrap();
    cmd.env_remove("KUBEDOCTOR_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help() {
    kubedoctor()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("diagnose issues with Kubernetes clusters"));
}

#[test]
fn test_cli_version() {
    kubedoctor()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("kubedoctor"));
}

#[test]
fn test_checkup_subcommand_exists() {
    kubedoctor()
        .args(["checkup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--restart-threshold"));
}

#[test]
fn test_problems_lists_catalog() {
    kubedoctor()
        .args(["problems", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PodCrashLoopBackOff"))
        .stdout(predicate::str::contains("MaxedOutHPAs"));
}

#[test]
fn test_log_json_before_subcommand() {
    kubedoctor()
        .args(["--log-json", "problems", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PodCrashLoopBackOff"));

    kubedoctor()
        .args(["--log-json", "checkup", "--no-color", "--pods-file"])
        .arg(fixture("pods_healthy.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_healthy.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Everything looks good"));
}

#[test]
fn test_log_json_after_subcommand() {
    kubedoctor()
        .args(["problems", "--log-json", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MaxedOutHPAs"));
}

#[test]
fn test_checkup_options_before_subcommand_rejected() {
    kubedoctor()
        .args(["--no-color", "problems"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("must follow the subcommand"));
}

#[test]
fn test_healthy_snapshot_exits_zero() {
    kubedoctor()
        .args(["--no-color", "--pods-file"])
        .arg(fixture("pods_healthy.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_healthy.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Everything looks good"));
}

#[test]
fn test_broken_snapshot_exits_one() {
    kubedoctor()
        .args(["checkup", "--no-color", "--pods-file"])
        .arg(fixture("pods_broken.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_maxed.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("PodNotReady"))
        .stdout(predicate::str::contains("(owned by billing)"))
        .stdout(predicate::str::contains("[1 occurrence]"))
        .stdout(predicate::str::contains("More information/help:"));
}

#[test]
fn test_disabled_problems_are_skipped() {
    let cmd = kubedoctor()
        .args(["--no-color", "--restart-threshold", "100"])
        .args(["--disable", "PodCrashLoopBackOff", "--disable", "PodNotReady"])
        .args(["--disable", "PodOOMKilled", "--disable", "PodImagePullBackOff"])
        .args(["--disable", "PodPending", "--disable", "MaxedOutHPAs"])
        .arg("--pods-file")
        .arg(fixture("pods_broken.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_maxed.json"))
        .assert()
        .code(0);
    cmd.stdout(predicate::str::contains("Everything looks good"));
}

#[test]
fn test_unknown_disabled_problem_is_fatal() {
    kubedoctor()
        .args(["--disable", "PodOnFire", "--pods-file"])
        .arg(fixture("pods_healthy.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_healthy.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown problem id: PodOnFire"));
}

#[test]
fn test_unreadable_snapshot_is_fatal() {
    kubedoctor()
        .args(["--pods-file"])
        .arg(fixture("missing.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_healthy.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to list pods"))
        .stdout(predicate::str::contains("Checking for problems").not());
}

#[test]
fn test_pods_file_requires_hpas_file() {
    kubedoctor()
        .args(["--pods-file"])
        .arg(fixture("pods_healthy.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--hpas-file"));
}

#[test]
fn test_settings_file_threshold() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("kubedoctor.toml");
    std::fs::write(
        &settings,
        "restart_threshold = 1\ndisabled_problems = [\"PodOOMKilled\"]\n",
    )
    .unwrap();

    kubedoctor()
        .args(["--no-color", "--config"])
        .arg(&settings)
        .arg("--pods-file")
        .arg(fixture("pods_broken.json"))
        .arg("--hpas-file")
        .arg(fixture("hpas_healthy.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("worker-0 has restarted 1 time(s)"))
        .stdout(predicate::str::contains("PodOOMKilled").not());
}
