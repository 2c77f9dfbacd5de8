//! Test helpers for behavioral specifications.
//!
//! Provides a high-level DSL for driving the gld binary.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// Aggressive timer polling for fast tests.
//
// IMPORTANT:
//   Do NOT change this.
//   File a performance bug instead.
const GL_TIMER_CHECK_MS: &str = "25";

// Spec polling timeouts
pub const SPEC_POLL_INTERVAL_MS: u64 = 10;
pub const SPEC_WAIT_MAX_MS: u64 = 2000;

/// Returns the path to a binary, checking llvm-cov target directory first.
/// This works with both standard builds and llvm-cov coverage runs.
/// Falls back to resolving relative to the test binary itself when
/// CARGO_MANIFEST_DIR is stale (e.g. compiled by a removed worktree
/// into a shared target directory).
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    // Check for llvm-cov target directory first
    let llvm_cov_path = manifest_dir.join("target/llvm-cov-target/debug").join(name);
    if llvm_cov_path.exists() {
        return llvm_cov_path;
    }

    // Standard target directory (works when CARGO_MANIFEST_DIR is correct)
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }

    // Fallback: resolve relative to the test binary itself.
    // The test binary lives at target/debug/deps/specs-<hash>, so its
    // grandparent is target/debug/ where gld is built.
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }

    standard
}

/// Returns the path to the gld daemon binary.
pub fn gld_binary() -> PathBuf {
    binary_path("gld")
}

/// Create a CLI builder for gld invocations
pub fn gld() -> CliBuilder {
    CliBuilder::new()
}

/// High-level CLI builder for fluent test assertions
pub struct CliBuilder {
    args: Vec<String>,
    dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl CliBuilder {
    fn new() -> Self {
        Self {
            args: Vec::new(),
            dir: None,
            envs: vec![("GL_TIMER_CHECK_MS".into(), GL_TIMER_CHECK_MS.into())],
        }
    }

    /// Add CLI arguments
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set working directory
    pub fn pwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.dir = Some(path.into());
        self
    }

    /// Set environment variable
    pub fn env(mut self, key: &str, value: impl AsRef<Path>) -> Self {
        self.envs.push((
            key.to_string(),
            value.as_ref().to_string_lossy().to_string(),
        ));
        self
    }

    /// Build the command without running it
    pub fn command(self) -> Command {
        let mut cmd = Command::new(gld_binary());
        cmd.args(&self.args);

        if let Some(dir) = self.dir {
            cmd.current_dir(dir);
        }

        // Prevent the parent's GL_CONFIG and GL_STATE_DIR from leaking in.
        // They would point the daemon at the operator's real config and
        // state instead of the test fixture.
        cmd.env_remove("GL_CONFIG");
        cmd.env_remove("GL_STATE_DIR");

        for (key, value) in self.envs {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run and expect success (exit code 0)
    pub fn passes(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    /// Run and expect failure (non-zero exit code)
    pub fn fails(self) -> RunAssert {
        let mut cmd = self.command();
        let output = cmd.output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

/// Result of a CLI run for chaining assertions
pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    /// Get stdout as string
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    /// Get stderr as string
    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    /// Assert stdout equals expected exactly (with diff on failure).
    /// **Prefer this for format specs** - catches format regressions.
    pub fn stdout_eq(self, expected: &str) -> Self {
        let stdout = self.stdout();
        similar_asserts::assert_eq!(stdout, expected);
        self
    }

    /// Assert stderr equals expected exactly (with diff on failure).
    pub fn stderr_eq(self, expected: &str) -> Self {
        let stderr = self.stderr();
        similar_asserts::assert_eq!(stderr, expected);
        self
    }

    /// Assert stdout contains substring.
    /// Use when exact comparison isn't practical.
    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            stdout.contains(expected),
            "stdout does not contain '{}'\nstdout: {}",
            expected,
            stdout
        );
        self
    }

    /// Assert stdout does not contain substring.
    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(
            !stdout.contains(unexpected),
            "stdout should not contain '{}'\nstdout: {}",
            unexpected,
            stdout
        );
        self
    }

    /// Assert stderr contains substring.
    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            stderr.contains(expected),
            "stderr does not contain '{}'\nstderr: {}",
            expected,
            stderr
        );
        self
    }

    /// Assert stderr does not contain substring.
    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(
            !stderr.contains(unexpected),
            "stderr should not contain '{}'\nstderr: {}",
            unexpected,
            stderr
        );
        self
    }
}

// =============================================================================
// Polling
// =============================================================================

/// Poll a condition until it returns true or timeout is reached.
/// Uses aggressive polling for fast tests.
pub fn wait_for<F>(timeout_ms: u64, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = std::time::Duration::from_millis(timeout_ms);
    let poll_interval = std::time::Duration::from_millis(SPEC_POLL_INTERVAL_MS);

    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        std::thread::sleep(poll_interval);
    }
    false
}

// =============================================================================
// Fixture
// =============================================================================

/// Temporary test fixture: an isolated state directory, a config file, and
/// a job registry the daemon reads upstream runs from.
pub struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    /// Create an empty fixture
    pub fn empty() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("state")).unwrap();
        std::fs::create_dir_all(dir.path().join("registry")).unwrap();
        Self { dir }
    }

    /// Get the fixture path (working directory for build commands)
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Isolated state directory for this test (GL_STATE_DIR)
    pub fn state_path(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Root of the job registry the config points at
    pub fn registry_root(&self) -> PathBuf {
        self.dir.path().join("registry")
    }

    /// Path the config file is written to (GL_CONFIG)
    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    /// Write a config file with the standard settings block plus the given
    /// trigger sections.
    pub fn config(&self, triggers: &str) {
        let body = format!(
            "[settings]\nregistry_root = \"{}\"\nlog_path = \"{}\"\n\n{}",
            self.registry_root().display(),
            self.state_path().join("daemon.log").display(),
            triggers
        );
        std::fs::write(self.config_path(), body).unwrap();
    }

    /// Write a file at the given path (parent directories created automatically)
    pub fn file(&self, path: impl AsRef<Path>, content: &str) {
        let full_path = self.dir.path().join(path.as_ref());
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full_path, content).unwrap();
    }

    /// Record a completed run in the registry.
    pub fn record_run(&self, job: &str, number: u64, outcome: &str) {
        let dir = self.registry_root().join(job);
        std::fs::create_dir_all(&dir).unwrap();
        let record = serde_json::json!({ "number": number, "outcome": outcome });
        std::fs::write(dir.join(format!("{number}.json")), record.to_string()).unwrap();
    }

    /// Record a run that is still in progress (no outcome yet).
    pub fn record_in_progress(&self, job: &str, number: u64) {
        let dir = self.registry_root().join(job);
        std::fs::create_dir_all(&dir).unwrap();
        let record = serde_json::json!({ "number": number });
        std::fs::write(dir.join(format!("{number}.json")), record.to_string()).unwrap();
    }

    /// Register a job with no runs at all.
    pub fn add_job(&self, job: &str) {
        std::fs::create_dir_all(self.registry_root().join(job)).unwrap();
    }

    /// Run gld against this fixture's config and state
    pub fn gld(&self) -> CliBuilder {
        gld()
            .pwd(self.path())
            .env("GL_STATE_DIR", self.state_path())
            .env("GL_CONFIG", self.config_path())
    }

    /// Read the daemon log file contents (for debugging test failures)
    pub fn daemon_log(&self) -> String {
        let log_path = self.state_path().join("daemon.log");
        std::fs::read_to_string(&log_path).unwrap_or_else(|_| "(no daemon log)".to_string())
    }

    /// Kill the daemon process with SIGKILL (simulates crash).
    /// Returns true if the process was killed, false if PID not found or kill failed.
    pub fn daemon_kill(&self) -> bool {
        let pid_file = self.state_path().join("daemon.pid");
        if let Ok(content) = std::fs::read_to_string(&pid_file) {
            if let Ok(pid) = content.trim().parse::<u32>() {
                Command::new("kill")
                    .args(["-9", &pid.to_string()])
                    .stdout(std::process::Stdio::null())
                    .stderr(std::process::Stdio::null())
                    .status()
                    .map(|s| s.success())
                    .unwrap_or(false)
            } else {
                false
            }
        } else {
            false
        }
    }
}

impl Drop for Fixture {
    fn drop(&mut self) {
        // A test that failed mid-spec may leave its daemon running
        let _ = self.daemon_kill();
    }
}
