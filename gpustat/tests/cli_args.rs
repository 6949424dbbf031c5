//! CLI tests for the gpustat binary. Only paths that need no GPU tools are run.
use assert_cmd::prelude::*;
use std::process::Command;

fn run_gpustat(args: &[&str], config: &std::path::Path) -> (bool, String, String) {
    let output = Command::cargo_bin("gpustat")
        .expect("gpustat binary")
        .env("GPUSTAT_CONFIG", config)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run gpustat");
    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn test_help_mentions_short_and_long_flags() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out, err) = run_gpustat(&["--help"], &dir.path().join("none.cfg"));
    assert!(ok);
    let text = format!("{out}{err}");
    assert!(text.contains("Usage:"));
    for flag in ["--config", "-c", "--vendor", "-v", "--gpu", "-g", "--inventory", "-i", "--gpus"] {
        assert!(text.contains(flag), "help text missing {flag}\n{text}");
    }
}

#[test]
fn test_unknown_vendor_prints_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out, _) = run_gpustat(&["--vendor", "bogus"], &dir.path().join("missing.cfg"));
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(out.trim()).expect("stdout is JSON");
    assert_eq!(json["error"][0]["code"], 200);
    assert_eq!(json["error"][0]["extra"], "VENDOR=bogus");
}

#[test]
fn test_vendor_from_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = dir.path().join("gpustat.cfg");
    std::fs::write(&cfg, "VENDOR=\"3dfx\"\nGPUID=\"0\"\n").unwrap();
    let (ok, out, _) = run_gpustat(&[], &cfg);
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(out.trim()).expect("stdout is JSON");
    assert_eq!(json["error"][0]["extra"], "VENDOR=3dfx");
}

#[test]
fn test_bad_batch_prints_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let (ok, out, _) = run_gpustat(&["--gpus", "[{\"vendor\":"], &dir.path().join("none.cfg"));
    assert!(ok);
    let json: serde_json::Value = serde_json::from_str(out.trim()).expect("stdout is JSON");
    assert_eq!(json["error"]["error"][0]["code"], 500);
}

#[test]
fn test_unexpected_argument_reports_usage() {
    let dir = tempfile::tempdir().unwrap();
    let (_, out, err) = run_gpustat(&["--frobnicate"], &dir.path().join("none.cfg"));
    assert!(out.is_empty());
    assert!(err.contains("Unexpected argument --frobnicate"));
}
