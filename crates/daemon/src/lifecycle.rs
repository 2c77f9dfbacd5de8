// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle: state directory, single-instance lock, logging,
//! and wiring the runtime from a validated config.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use fs2::FileExt;
use thiserror::Error;
use tracing::warn;

use gl_adapters::{
    BuildError, BuildScheduler, CommandBuildScheduler, DirJobRegistry, NoOpBuildScheduler,
};
use gl_core::{SystemClock, TriggerCause, UuidIdGen};
use gl_engine::{GateEvaluator, GateRuntime, TriggerGate};

use crate::config::DaemonConfig;

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Log path has no file name: {0}")]
    BadLogPath(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Version string embedded at build time.
pub fn version_string() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"))
}

/// Filesystem layout under the state directory.
///
/// One daemon serves a user; paths live under `~/.local/state/greenlight`
/// (or the `$XDG_STATE_HOME` / `$GL_STATE_DIR` overrides).
pub struct StateDir {
    pub root: PathBuf,
    pub lock_path: PathBuf,
    pub version_path: PathBuf,
    pub config_path: PathBuf,
}

impl StateDir {
    pub fn resolve() -> Result<Self, LifecycleError> {
        let root = crate::env::state_dir()?;
        Ok(Self {
            lock_path: root.join("daemon.pid"),
            version_path: root.join("daemon.version"),
            config_path: root.join("config.toml"),
            root,
        })
    }
}

/// Exclusive single-instance lock.
#[derive(Debug)]
pub struct InstanceLock {
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
    version_path: PathBuf,
}

impl InstanceLock {
    /// Acquire the lock file, write our PID, and record the running version.
    pub fn acquire(state: &StateDir) -> Result<Self, LifecycleError> {
        std::fs::create_dir_all(&state.root)?;

        // Open without truncating so a failed acquisition does not wipe the
        // running daemon's PID.
        let file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&state.lock_path)?;
        file.try_lock_exclusive()
            .map_err(LifecycleError::LockFailed)?;

        // Write PID (truncate now that we hold the lock)
        let mut file = file;
        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        let file = file;

        std::fs::write(&state.version_path, version_string())?;

        Ok(Self {
            file,
            lock_path: state.lock_path.clone(),
            version_path: state.version_path.clone(),
        })
    }

    /// Remove the PID and version files. The lock itself releases on drop.
    pub fn release(self) {
        if self.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }
        if self.version_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.version_path) {
                warn!("Failed to remove version file: {}", e);
            }
        }
    }
}

/// Initialize tracing. With a log path, writes through a non-blocking file
/// appender and returns the flush guard; otherwise logs to stderr.
pub fn setup_logging(
    log_path: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let Some(path) = log_path else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let dir = path
        .parent()
        .ok_or_else(|| LifecycleError::BadLogPath(path.to_path_buf()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| LifecycleError::BadLogPath(path.to_path_buf()))?;
    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(Some(guard))
}

/// Downstream build dispatch, chosen per run mode.
#[derive(Clone)]
pub enum BuildRunner {
    Command(CommandBuildScheduler),
    DryRun(NoOpBuildScheduler),
}

#[async_trait]
impl BuildScheduler for BuildRunner {
    async fn schedule_build(&self, cause: &TriggerCause) -> Result<(), BuildError> {
        match self {
            Self::Command(command) => command.schedule_build(cause).await,
            Self::DryRun(noop) => noop.schedule_build(cause).await,
        }
    }
}

/// Runtime with the daemon's concrete adapter types.
pub type DaemonRuntime = GateRuntime<DirJobRegistry, BuildRunner, SystemClock, UuidIdGen>;

/// Wire the runtime from a validated config.
pub fn build_runtime(config: &DaemonConfig, dry_run: bool) -> DaemonRuntime {
    let registry = DirJobRegistry::new(&config.registry_root);
    let mut runtime = GateRuntime::new(SystemClock);

    for (name, trigger) in &config.triggers {
        let runner = if dry_run {
            BuildRunner::DryRun(NoOpBuildScheduler::new())
        } else {
            BuildRunner::Command(CommandBuildScheduler::new(trigger.build.as_str()))
        };
        let gate = TriggerGate::new(
            name.clone(),
            GateEvaluator::new(registry.clone(), trigger.upstream.clone()),
            runner,
            SystemClock,
            UuidIdGen,
        );
        runtime.register(gate, trigger.schedule.clone());
    }

    runtime
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
