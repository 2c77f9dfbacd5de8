// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Filesystem-backed job registry.
//!
//! Layout: one directory per job under the root, one JSON record per run,
//! named by run number:
//!
//! ```text
//! <root>/deploy-api/142.json    {"number": 142, "outcome": "SUCCESS", ...}
//! ```
//!
//! The latest completed run is the highest-numbered record carrying an
//! outcome. Records without an outcome are runs still in progress and are
//! skipped.

use super::{CompletedRun, JobHandle, JobRegistry, RegistryError};
use async_trait::async_trait;
use gl_core::{JobName, RunOutcome, RunRef};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One run record on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub number: u64,
    /// Registry-native run id; defaults to `<job>/<number>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    /// Human label; defaults to `<job> #<number>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// `None` while the run is still in progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<RunOutcome>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at_epoch_ms: Option<u64>,
}

/// Job registry reading per-job run records from a directory tree.
#[derive(Debug, Clone)]
pub struct DirJobRegistry {
    root: PathBuf,
}

impl DirJobRegistry {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl JobRegistry for DirJobRegistry {
    async fn lookup_job(&self, name: &JobName) -> Result<Option<JobHandle>, RegistryError> {
        // Job names never traverse outside the root.
        let raw = name.as_str();
        if raw.is_empty() || raw == "." || raw == ".." || raw.contains(['/', '\\']) {
            return Ok(None);
        }

        let dir = self.root.join(raw);
        if dir.is_dir() {
            Ok(Some(JobHandle {
                name: name.clone(),
                key: dir.to_string_lossy().into_owned(),
            }))
        } else {
            Ok(None)
        }
    }

    async fn last_completed_run(
        &self,
        job: &JobHandle,
    ) -> Result<Option<CompletedRun>, RegistryError> {
        let entries = match std::fs::read_dir(&job.key) {
            Ok(entries) => entries,
            // A job removed between lookup and read counts as having no runs.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RegistryError::Io(e)),
        };

        let mut latest: Option<RunRecord> = None;
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let text = std::fs::read_to_string(&path)?;
            let record: RunRecord =
                serde_json::from_str(&text).map_err(|e| RegistryError::MalformedRecord {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;

            if record.outcome.is_none() {
                continue; // still running
            }
            if latest.as_ref().map_or(true, |l| record.number > l.number) {
                latest = Some(record);
            }
        }

        Ok(latest.and_then(|record| completed_run(&job.name, record)))
    }
}

fn completed_run(name: &JobName, record: RunRecord) -> Option<CompletedRun> {
    let outcome: RunOutcome = record.outcome?;
    let run_id = record
        .run_id
        .unwrap_or_else(|| format!("{}/{}", name, record.number));
    let display_name = record
        .display_name
        .unwrap_or_else(|| format!("{} #{}", name, record.number));
    Some(CompletedRun {
        run: RunRef::new(run_id, display_name),
        outcome,
    })
}

#[cfg(test)]
#[path = "dir_tests.rs"]
mod tests;
