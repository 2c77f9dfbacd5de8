// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job registry adapters
//!
//! The registry is the source of truth for upstream jobs and their runs.
//! It is read-only from this side: the gate consults it, never writes it.

mod dir;

pub use dir::{DirJobRegistry, RunRecord};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeJobRegistry;

use async_trait::async_trait;
use gl_core::{JobName, RunOutcome, RunRef};
use thiserror::Error;

/// Errors from registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed run record at {path}: {message}")]
    MalformedRecord { path: String, message: String },

    #[error("registry backend error: {0}")]
    Backend(String),
}

/// Handle to a job the registry knows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub name: JobName,
    /// Registry-native locator (e.g. a directory path).
    pub key: String,
}

/// A run that finished, with its terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRun {
    pub run: RunRef,
    pub outcome: RunOutcome,
}

/// Adapter for resolving upstream jobs and their latest completed runs
#[async_trait]
pub trait JobRegistry: Clone + Send + Sync + 'static {
    /// Look up a job by name. `Ok(None)` means the registry does not know it.
    async fn lookup_job(&self, name: &JobName) -> Result<Option<JobHandle>, RegistryError>;

    /// Latest completed run of a job. `Ok(None)` means nothing has finished
    /// yet. In-progress runs are never returned.
    async fn last_completed_run(
        &self,
        job: &JobHandle,
    ) -> Result<Option<CompletedRun>, RegistryError>;
}
