//! CLI integration tests for the `tokensync` binary.
//!
//! Runs the built binary in a scratch working directory with the Figma
//! credentials removed from its environment, so nothing reaches the network.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/variables_response.json")
}

/// Run tokensync in `cwd` and return (stdout, stderr, exit code).
fn run(cwd: &Path, args: &[&str]) -> (String, String, Option<i32>) {
    let output: Output = Command::new(env!("CARGO_BIN_EXE_tokensync"))
        .args(args)
        .current_dir(cwd)
        .env_remove("FIGMA_FILE_KEY")
        .env_remove("FIGMA_PAT")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute tokensync");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code())
}

// ============================================================================
// Credentials and configuration
// ============================================================================

#[test]
fn test_sync_without_credentials_exits_2() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run(temp.path(), &["sync"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("FIGMA_FILE_KEY and FIGMA_PAT not found"), "stderr: {}", stderr);
    assert!(fs::read_dir(temp.path()).unwrap().next().is_none(), "nothing should be written");
}

#[test]
fn test_audit_without_token_names_only_token() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run(temp.path(), &["audit", "--file-key", "abc"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("FIGMA_PAT not found"), "stderr: {}", stderr);
    assert!(!stderr.contains("FIGMA_FILE_KEY"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_config_exits_2() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tokensync.toml"), "[remote]\nhost = \"ftp://example.com\"\n").unwrap();
    let (_, stderr, code) = run(temp.path(), &["sync", "--file-key", "abc", "--token", "figd_x"]);
    assert_eq!(code, Some(2));
    assert!(stderr.contains("remote.host"), "stderr: {}", stderr);
}

// ============================================================================
// Offline generation
// ============================================================================

#[test]
fn test_generate_from_fixture() {
    let temp = TempDir::new().unwrap();
    let snapshot = fixture();
    let (stdout, stderr, code) = run(temp.path(), &["generate", snapshot.to_str().unwrap()]);
    assert_eq!(code, Some(0), "stderr: {}", stderr);
    assert!(stdout.contains("10 finding(s)"), "stdout: {}", stdout);

    let css = fs::read_to_string(temp.path().join("generated/design-tokens.css")).unwrap();
    assert!(css.starts_with(":root {"));
    assert!(css.contains("--DT-Light-Mode-Brand-Primary: var(--DT-__primitive-Cobalt-50);"));

    let js = fs::read_to_string(temp.path().join("generated/designTokens.js")).unwrap();
    assert!(js.contains("generated/designTokens.js"));
    assert!(js.contains("export default DESIGN_TOKENS;"));
}

#[test]
fn test_generate_respects_out_flag() {
    let temp = TempDir::new().unwrap();
    let snapshot = fixture();
    let (_, _, code) = run(temp.path(), &["generate", snapshot.to_str().unwrap(), "--out", "dist/tokens"]);
    assert_eq!(code, Some(0));
    assert!(temp.path().join("dist/tokens/design-tokens.css").exists());
    assert!(!temp.path().join("generated").exists());
}

#[test]
fn test_generate_missing_snapshot_exits_1() {
    let temp = TempDir::new().unwrap();
    let (_, stderr, code) = run(temp.path(), &["generate", "missing.json"]);
    assert_eq!(code, Some(1));
    assert!(stderr.starts_with("Error:"), "stderr: {}", stderr);
}
