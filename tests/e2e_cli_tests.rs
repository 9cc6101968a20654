//! End-to-end CLI tests. These spawn the real `scrub` binary and cover
//! argument handling, preflight guards, and failure modes that need no
//! running backend. The base URL points at a loopback port nothing
//! listens on, so any request that does slip through fails fast with a
//! connection error instead of reaching a real service.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

const DEAD_BACKEND: &str = "http://127.0.0.1:1";

fn scrub() -> Command {
    let mut cmd = Command::cargo_bin("scrub").expect("binary");
    cmd.env("SCRUB_BASE_URL", DEAD_BACKEND);
    cmd.env_remove("SCRUB_TIMEOUT_SECS");
    cmd
}

#[test]
fn help_lists_every_subcommand() {
    scrub()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("text"))
        .stdout(predicate::str::contains("upload"))
        .stdout(predicate::str::contains("providers"))
        .stdout(predicate::str::contains("health"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    scrub()
        .arg("not-a-real-command")
        .assert()
        .failure()
        .code(predicate::eq(2));
}

#[test]
fn text_without_input_fails_with_guidance() {
    scrub()
        .arg("text")
        .assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("--stdin"));
}

#[test]
fn whitespace_only_text_is_rejected_before_submission() {
    scrub()
        .args(["text", "   \n\t  "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to anonymize"));
}

#[test]
fn out_of_range_temperature_blocks_submission() {
    scrub()
        .args(["text", "Patient note", "-P", "temperature=2.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("temperature"))
        .stderr(predicate::str::contains("[0.0, 2.0]"));
}

#[test]
fn garbage_numeric_parameter_blocks_submission() {
    scrub()
        .args(["text", "Patient note", "-P", "max_tokens=many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_tokens"))
        .stderr(predicate::str::contains("expects a number"));
}

#[test]
fn unknown_parameter_key_is_rejected() {
    scrub()
        .args(["text", "Patient note", "-P", "creativity=11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown parameter"));
}

#[test]
fn malformed_parameter_pair_is_rejected() {
    scrub()
        .args(["text", "Patient note", "-P", "temperature"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn upload_rejects_missing_file() {
    scrub()
        .args(["upload", "/definitely/missing/chart.pdf"])
        .assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn upload_rejects_unsupported_file_type() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "plain text").expect("write");

    scrub()
        .args(["upload", path.to_str().expect("utf-8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported file type"))
        .stderr(predicate::str::contains(".docx, .pdf"));
}

#[test]
fn upload_rejects_oversized_file_before_any_network_call() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("huge.pdf");
    // One byte over the 10 MB ceiling.
    std::fs::write(&path, vec![0u8; 10 * 1024 * 1024 + 1]).expect("write");

    scrub()
        .args(["upload", path.to_str().expect("utf-8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds maximum allowed size"));
}

#[test]
fn providers_reports_connection_failure() {
    scrub()
        .arg("providers")
        .assert()
        .failure()
        .code(predicate::eq(1))
        .stderr(predicate::str::contains("could not connect"));
}

#[test]
fn health_reports_connection_failure() {
    scrub()
        .arg("health")
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not connect"));
}

#[test]
fn text_submits_even_when_provider_list_is_down() {
    // The availability check is skipped when discovery fails; the
    // submission itself then surfaces the transport error.
    scrub()
        .args(["text", "Patient John Doe was admitted.", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not connect"));
}

#[test]
fn base_url_flag_overrides_environment() {
    scrub()
        .args(["health", "--base-url", "http://127.0.0.1:2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("127.0.0.1:2"));
}
