// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: a TOML file naming the triggers and their gates.
//!
//! ```toml
//! [settings]
//! registry_root = "/var/lib/greenlight/registry"
//!
//! [trigger.deploy-all]
//! schedule = "*/5 * * * *"
//! upstream = "deploy-api, deploy-web"
//! build    = "curl -fsS -XPOST http://ci/job/deploy-all/build"
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;

use gl_core::{JobName, ScheduleParseError, ScheduleSpec};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("trigger '{trigger}': {source}")]
    BadSchedule {
        trigger: String,
        #[source]
        source: ScheduleParseError,
    },

    #[error("trigger '{trigger}': upstream list is empty")]
    EmptyUpstream { trigger: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    settings: RawSettings,
    #[serde(default)]
    trigger: IndexMap<String, RawTrigger>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    registry_root: PathBuf,
    log_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTrigger {
    schedule: String,
    upstream: String,
    build: String,
}

/// A validated trigger definition.
#[derive(Debug, Clone)]
pub struct TriggerConfig {
    pub schedule: ScheduleSpec,
    pub upstream: Vec<JobName>,
    pub build: String,
}

/// Validated daemon configuration. Trigger order follows the file.
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub registry_root: PathBuf,
    pub log_path: Option<PathBuf>,
    pub triggers: IndexMap<String, TriggerConfig>,
}

impl DaemonConfig {
    /// Load and validate the config file, stopping at the first invalid
    /// trigger. Sanity warnings on otherwise valid schedules are logged.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = read_raw(path)?;

        let mut triggers = IndexMap::with_capacity(raw.trigger.len());
        for (name, trigger) in raw.trigger {
            let (validated, warnings) = validate_trigger(&name, &trigger)?;
            for warning in warnings {
                tracing::warn!(trigger = %name, "{warning}");
            }
            triggers.insert(name, validated);
        }

        Ok(Self {
            registry_root: raw.settings.registry_root,
            log_path: raw.settings.log_path,
            triggers,
        })
    }

    /// Validate every trigger, reporting each one instead of stopping at the
    /// first problem. Read and parse failures still fail the whole file.
    pub fn check(path: &Path) -> Result<Vec<TriggerReport>, ConfigError> {
        let raw = read_raw(path)?;

        let mut reports = Vec::with_capacity(raw.trigger.len());
        for (name, trigger) in raw.trigger {
            let status = match validate_trigger(&name, &trigger) {
                Ok((_, warnings)) if warnings.is_empty() => CheckStatus::Ok,
                Ok((_, warnings)) => CheckStatus::Warning(warnings.join("; ")),
                Err(ConfigError::BadSchedule { source, .. }) => {
                    CheckStatus::Error(source.to_string())
                }
                Err(ConfigError::EmptyUpstream { .. }) => {
                    CheckStatus::Error("upstream list is empty".to_string())
                }
                Err(e) => CheckStatus::Error(e.to_string()),
            };
            reports.push(TriggerReport { name, status });
        }
        Ok(reports)
    }
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn validate_trigger(
    name: &str,
    raw: &RawTrigger,
) -> Result<(TriggerConfig, Vec<String>), ConfigError> {
    let schedule =
        ScheduleSpec::parse(&raw.schedule).map_err(|source| ConfigError::BadSchedule {
            trigger: name.to_string(),
            source,
        })?;

    let upstream = split_upstream(&raw.upstream);
    if upstream.is_empty() {
        return Err(ConfigError::EmptyUpstream {
            trigger: name.to_string(),
        });
    }

    let warnings = schedule.check_sanity().into_iter().collect();
    Ok((
        TriggerConfig {
            schedule,
            upstream,
            build: raw.build.clone(),
        },
        warnings,
    ))
}

/// Split the comma-separated upstream list, dropping empty segments.
fn split_upstream(raw: &str) -> Vec<JobName> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(JobName::new)
        .collect()
}

/// Per-trigger validation result for `--check`.
#[derive(Debug)]
pub struct TriggerReport {
    pub name: String,
    pub status: CheckStatus,
}

#[derive(Debug)]
pub enum CheckStatus {
    Ok,
    Warning(String),
    Error(String),
}

impl TriggerReport {
    pub fn is_error(&self) -> bool {
        matches!(self.status, CheckStatus::Error(_))
    }
}

impl fmt::Display for TriggerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            CheckStatus::Ok => write!(f, "trigger '{}': ok", self.name),
            CheckStatus::Warning(msg) => write!(f, "trigger '{}': warning: {msg}", self.name),
            CheckStatus::Error(msg) => write!(f, "trigger '{}': error: {msg}", self.name),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
