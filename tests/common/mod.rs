//! Common test utilities and fixtures for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Path to the compiled promptmeter binary under test.
pub fn promptmeter_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_promptmeter"))
}

/// Run the binary in `dir` with the given args and piped stdin.
///
/// Using a temp directory as the working directory keeps state files and
/// config discovery isolated per test.
pub fn run_with_stdin(dir: &Path, args: &[&str], stdin_text: &str) -> Output {
    use std::io::Write;

    let mut child = Command::new(promptmeter_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn promptmeter");

    child
        .stdin
        .as_mut()
        .expect("stdin is piped")
        .write_all(stdin_text.as_bytes())
        .expect("Failed to write stdin");

    child.wait_with_output().expect("Failed to wait for promptmeter")
}

/// Write a `promptmeter.toml` into the temp directory and return its path.
pub fn create_config_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("promptmeter.toml");
    std::fs::write(&path, content).expect("Failed to write config file");
    path
}
