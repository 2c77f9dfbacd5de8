// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Greenlight Daemon (gld)
//!
//! Background process that evaluates build gates on their schedules and
//! fires downstream builds when every upstream is green.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod env;
mod lifecycle;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

use gl_engine::TickOutcome;

use crate::config::DaemonConfig;
use crate::lifecycle::{version_string, InstanceLock, LifecycleError, StateDir};

enum Mode {
    Daemon,
    Check,
    Once,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut mode = Mode::Daemon;
    let mut dry_run = false;
    let mut config_override: Option<PathBuf> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("gld {}", version_string());
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_help();
                return Ok(());
            }
            "--config" => {
                let Some(path) = args.next() else {
                    eprintln!("error: --config requires a path");
                    std::process::exit(1);
                };
                config_override = Some(PathBuf::from(path));
            }
            "--check" => mode = Mode::Check,
            "--once" => mode = Mode::Once,
            "--dry-run" => dry_run = true,
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: gld [--config <path>] [--check | --once] [--dry-run]");
                std::process::exit(1);
            }
        }
    }

    let config_path = match config_override.or_else(env::config_path) {
        Some(path) => path,
        None => StateDir::resolve()?.config_path,
    };

    match mode {
        Mode::Check => run_check(&config_path),
        Mode::Once => run_once(&config_path, dry_run).await,
        Mode::Daemon => run_daemon(&config_path, dry_run).await,
    }
}

fn print_help() {
    println!("gld {}", version_string());
    println!("Greenlight Daemon - evaluates build gates and fires downstream builds");
    println!();
    println!("USAGE:");
    println!("    gld [OPTIONS]");
    println!();
    println!("On its schedule, each configured trigger checks the latest completed");
    println!("run of every upstream job and schedules its downstream build when");
    println!("all of them succeeded.");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>  Use this config file (default: $GL_CONFIG,");
    println!("                     else <state-dir>/config.toml)");
    println!("    --check          Validate the config and exit");
    println!("    --once           Evaluate every trigger once, then exit");
    println!("    --dry-run        Log downstream builds instead of running them");
    println!("    -h, --help       Print help information");
    println!("    -v, --version    Print version information");
}

/// Validate the config, print one line per trigger, exit non-zero on errors.
fn run_check(config_path: &Path) -> ! {
    match DaemonConfig::check(config_path) {
        Ok(reports) if reports.is_empty() => {
            println!("no triggers configured");
            std::process::exit(0);
        }
        Ok(reports) => {
            let mut failed = false;
            for report in &reports {
                println!("{report}");
                failed = failed || report.is_error();
            }
            std::process::exit(if failed { 1 } else { 0 });
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

/// Evaluate every trigger immediately, ignoring schedules, then exit.
async fn run_once(config_path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let _log_guard = lifecycle::setup_logging(None)?;

    let config = match DaemonConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let runtime = lifecycle::build_runtime(&config, dry_run);
    if runtime.is_empty() {
        println!("no triggers configured");
        return Ok(());
    }

    for (name, outcome) in runtime.tick_all().await {
        println!("{}", describe_outcome(&name, &outcome));
    }
    Ok(())
}

fn describe_outcome(name: &str, outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::Triggered(cause) => {
            format!("trigger '{name}': triggered ({})", cause.id)
        }
        TickOutcome::Held(result) => {
            let blockers: Vec<String> = result
                .consulted
                .iter()
                .filter(|dep| !dep.satisfies_gate())
                .map(|dep| {
                    if dep.found {
                        format!("{} {}", dep.name, dep.outcome)
                    } else {
                        format!("{} missing", dep.name)
                    }
                })
                .collect();
            format!("trigger '{name}': held ({})", blockers.join(", "))
        }
        TickOutcome::Overlapped => format!("trigger '{name}': skipped (evaluation in progress)"),
        TickOutcome::Faulted(e) => format!("trigger '{name}': error: {e}"),
    }
}

async fn run_daemon(config_path: &Path, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
    let state = StateDir::resolve()?;

    let config = match DaemonConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    // Write startup marker to log (before tracing setup, so operators can
    // find where this attempt begins)
    if let Some(log_path) = config.log_path.as_deref() {
        rotate_log_if_needed(log_path);
        write_startup_marker(log_path)?;
    }

    let log_guard = lifecycle::setup_logging(config.log_path.as_deref())?;

    info!("Starting daemon");

    let lock = match InstanceLock::acquire(&state) {
        Ok(lock) => lock,
        Err(LifecycleError::LockFailed(_)) => {
            // Another daemon holds the lock - print a human-readable message
            // instead of a raw debug error.
            let pid = std::fs::read_to_string(&state.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            let version = std::fs::read_to_string(&state.version_path)
                .unwrap_or_default()
                .trim()
                .to_string();

            eprintln!("gld is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            if !version.is_empty() {
                if version == version_string() {
                    eprintln!("  version: {version}");
                } else {
                    eprintln!(
                        "  version: {version} (outdated - current: {})",
                        version_string()
                    );
                }
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            write_startup_error(config.log_path.as_deref(), &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let runtime = lifecycle::build_runtime(&config, dry_run);
    if runtime.is_empty() {
        warn!("no triggers configured; daemon will idle");
    }
    if dry_run {
        info!("dry run: downstream builds will be logged, not executed");
    }

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(triggers = runtime.len(), "Daemon ready");

    // Signal ready for parent process (e.g., systemd, CLI waiting for startup)
    println!("READY");

    // Timer check interval (1-second resolution)
    // NOTE: Must be created outside the loop - tokio::select! re-evaluates
    // branches on each iteration, so using sleep() inside would reset on
    // every event, causing timers to never fire during activity.
    let mut timer_check = tokio::time::interval(timer_check_interval());

    loop {
        tokio::select! {
            // Graceful shutdown on SIGTERM
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            // Graceful shutdown on SIGINT
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }

            // Fire due trigger evaluations
            _ = timer_check.tick() => {
                for id in runtime.fired_timers() {
                    runtime.handle_timer(&id).await;
                }
            }
        }
    }

    lock.release();
    info!("Daemon stopped");
    Ok(())
}

/// Timer poll period: GL_TIMER_CHECK_MS override, default one second.
fn timer_check_interval() -> Duration {
    env::timer_check_ms().unwrap_or(Duration::from_secs(1))
}

/// Startup marker prefix written to the log before anything else.
/// Full format: "--- gld: starting (pid: 12345)"
const STARTUP_MARKER_PREFIX: &str = "--- gld: starting (pid: ";

/// Append the startup marker to the log file.
fn write_startup_marker(path: &Path) -> Result<(), LifecycleError> {
    use std::io::Write;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to the log file.
/// Tracing is non-blocking and may not flush before a fast exit.
fn write_startup_error(log_path: Option<&Path>, error: &LifecycleError) {
    use std::io::Write;

    let Some(path) = log_path else {
        return;
    };
    let Ok(mut file) = std::fs::OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

/// Rotate when the log exceeds this size.
const MAX_LOG_SIZE: u64 = 10 * 1024 * 1024;
/// Old rotations kept as `<log>.1` through `<log>.3`.
const MAX_LOG_ROTATIONS: u32 = 3;

fn rotation_path(path: &Path, n: u32) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(format!(".{n}"));
    PathBuf::from(os)
}

/// Shift old rotations up and move an oversized log to `<log>.1`.
fn rotate_log_if_needed(path: &Path) {
    let Ok(meta) = std::fs::metadata(path) else {
        return;
    };
    if meta.len() <= MAX_LOG_SIZE {
        return;
    }

    let _ = std::fs::remove_file(rotation_path(path, MAX_LOG_ROTATIONS));
    for n in (1..MAX_LOG_ROTATIONS).rev() {
        let from = rotation_path(path, n);
        if from.exists() {
            let _ = std::fs::rename(from, rotation_path(path, n + 1));
        }
    }
    let _ = std::fs::rename(path, rotation_path(path, 1));
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
