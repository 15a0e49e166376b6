//! CLI smoke tests for the user-directory-server binary
//!
//! These run the compiled binary: help/version output, configuration checks,
//! and a short-lived server answering `/health` and `/users`.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_user-directory-server");

fn run_server_bin(args: &[&str], home: &TempDir) -> std::process::Output {
    Command::new(BIN)
        .args(args)
        .env("HOME", home.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute user-directory-server")
}

fn write_config(dir: &TempDir, body: &str) -> String {
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, body).expect("Failed to write config file");
    path.to_string_lossy().into_owned()
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("no free port")
}

fn http_get(port: u16, path: &str) -> Option<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).ok()?;
    stream.set_read_timeout(Some(Duration::from_secs(2))).ok()?;
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    )
    .ok()?;
    let mut out = String::new();
    stream.read_to_string(&mut out).ok()?;
    Some(out)
}

struct KillOnDrop(Child);

impl Drop for KillOnDrop {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

#[test]
fn test_cli_help_command() {
    let home = TempDir::new().unwrap();
    let output = run_server_bin(&["--help"], &home);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user-directory-server"));
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--port"), "Should mention port option");
}

#[test]
fn test_cli_version_command() {
    let home = TempDir::new().unwrap();
    let output = run_server_bin(&["--version"], &home);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("user-directory-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let home = TempDir::new().unwrap();
    let output = run_server_bin(&["invalid-command"], &home);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid-command") || stderr.contains("unrecognized"));
}

#[test]
fn test_cli_config_validation_missing_file() {
    let home = TempDir::new().unwrap();
    let output = run_server_bin(&["--config", "/nonexistent/config.yaml", "check"], &home);

    assert!(!output.status.success(), "Should fail with missing config");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Config file not found"),
        "Should mention config file issue: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let home = TempDir::new().unwrap();
    let config = write_config(&home, "invalid: yaml: content: [unclosed");

    let output = run_server_bin(&["--config", &config, "check"], &home);

    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config"), "Should mention config: {stderr}");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        &format!(
            r#"
server:
  home_dir: "{}"
  host: "127.0.0.1"
  port: 8087

logging:
  default:
    console_level: info
    file: "logs/user_directory.log"
    file_level: info
    max_age_days: 28
    max_backups: 3
    max_size_mb: 1000

modules:
  api_ingress:
    enable_docs: true
  users_directory:
    default_page_size: 20
    unchanged_email: ignore
    latency: demo
"#,
            home.path().join("ud").to_string_lossy().replace('\\', "/")
        ),
    );

    let output = run_server_bin(&["--config", &config, "check"], &home);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_cli_check_rejects_bad_module_section() {
    let home = TempDir::new().unwrap();
    let config = write_config(
        &home,
        r#"
modules:
  users_directory:
    default_page_size: 500
    max_page_size: 10
"#,
    );

    let output = run_server_bin(&["--config", &config, "check"], &home);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("default_page_size"), "{stderr}");
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let home = TempDir::new().unwrap();
    let output = run_server_bin(&["--print-config", "--port", "9191"], &home);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"), "{stdout}");
}

#[test]
fn test_cli_subcommand_help() {
    let home = TempDir::new().unwrap();
    for sub in ["run", "check"] {
        let output = run_server_bin(&[sub, "--help"], &home);
        assert!(output.status.success(), "{sub} --help should succeed");
    }
}

#[test]
fn test_cli_run_serves_http() {
    let home = TempDir::new().unwrap();
    let port = free_port();
    let port_arg = port.to_string();

    let child = Command::new(BIN)
        .args(["--port", &port_arg, "run"])
        .env("HOME", home.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn server");
    let _guard = KillOnDrop(child);

    let deadline = Instant::now() + Duration::from_secs(15);
    let health = loop {
        if let Some(resp) = http_get(port, "/health") {
            break resp;
        }
        assert!(Instant::now() < deadline, "server did not come up");
        std::thread::sleep(Duration::from_millis(100));
    };
    assert!(health.starts_with("HTTP/1.1 200"), "{health}");
    assert!(health.contains("healthy"));
    assert!(health.to_ascii_lowercase().contains("x-request-id"));

    let users = http_get(port, "/users").expect("GET /users");
    assert!(users.starts_with("HTTP/1.1 200"), "{users}");
    assert!(users.contains(r#""success":true"#));
}
