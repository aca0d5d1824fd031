#![cfg(all(unix, feature = "cli"))]

use std::path::PathBuf;
use std::process::Command;

fn canusb() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_canusb"));
    cmd.env_remove("CANUSB_DEVICE").arg("--log-level").arg("error");
    cmd
}

fn missing_device() -> PathBuf {
    PathBuf::from(format!(
        "/tmp/canusb-missing-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ))
}

#[test]
fn version_prints_package_version() {
    let output = canusb().arg("version").output().expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("canusb "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn extended_version_reports_baud_rate() {
    let output = canusb()
        .args(["version", "--extended"])
        .output()
        .expect("version should run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("default_baud_rate: 2000000"));
}

#[test]
fn unsupported_speed_is_usage_error() {
    let output = canusb()
        .arg("dump")
        .arg("-d")
        .arg(missing_device())
        .args(["-s", "123456"])
        .output()
        .expect("dump should run");
    assert_eq!(output.status.code(), Some(64));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("123456"), "stderr: {stderr}");
}

#[test]
fn bad_identifier_is_rejected_before_opening_device() {
    let output = canusb()
        .arg("inject")
        .arg("-d")
        .arg(missing_device())
        .args(["-i", "12345", "-j", "00"])
        .output()
        .expect("inject should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn empty_payload_is_usage_error() {
    let output = canusb()
        .arg("inject")
        .arg("-d")
        .arg(missing_device())
        .args(["-i", "123", "-j", "zz"])
        .output()
        .expect("inject should run");
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn missing_device_is_transport_error() {
    let output = canusb()
        .arg("dump")
        .arg("-d")
        .arg(missing_device())
        .output()
        .expect("dump should run");
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"), "stderr: {stderr}");
}

#[test]
fn unknown_payload_mode_is_clap_error() {
    let output = canusb()
        .arg("inject")
        .arg("-d")
        .arg(missing_device())
        .args(["-i", "1", "-j", "00", "-m", "sometimes"])
        .output()
        .expect("inject should run");
    assert_eq!(output.status.code(), Some(2));
}
