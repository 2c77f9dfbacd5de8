// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake job registry for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{CompletedRun, JobHandle, JobRegistry, RegistryError};
use async_trait::async_trait;
use gl_core::{JobName, RunOutcome, RunRef};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

struct FakeRegistryState {
    /// Known jobs, each with an optional latest completed run.
    jobs: HashMap<String, Option<CompletedRun>>,
    /// When set, every call fails with this message.
    error: Option<String>,
    /// Recorded lookups, in call order.
    lookups: Vec<JobName>,
    /// Artificial latency per lookup, for overlap tests.
    delay: Duration,
}

/// Fake job registry for testing
#[derive(Clone)]
pub struct FakeJobRegistry {
    inner: Arc<Mutex<FakeRegistryState>>,
}

impl Default for FakeJobRegistry {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeRegistryState {
                jobs: HashMap::new(),
                error: None,
                lookups: Vec::new(),
                delay: Duration::ZERO,
            })),
        }
    }
}

impl FakeJobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job with no completed runs.
    pub fn add_job(&self, name: &str) {
        self.inner.lock().jobs.insert(name.to_string(), None);
    }

    /// Register a job whose latest completed run has the given outcome.
    pub fn set_latest_run(&self, name: &str, number: u64, outcome: RunOutcome) {
        let run = RunRef::new(format!("{name}/{number}"), format!("{name} #{number}"));
        self.inner
            .lock()
            .jobs
            .insert(name.to_string(), Some(CompletedRun { run, outcome }));
    }

    /// Make every subsequent call fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.inner.lock().error = Some(message.to_string());
    }

    /// Clear an injected failure.
    pub fn clear_failure(&self) {
        self.inner.lock().error = None;
    }

    /// Delay every lookup, so tests can hold an evaluation open.
    pub fn set_delay(&self, delay: Duration) {
        self.inner.lock().delay = delay;
    }

    /// Job names looked up so far, in call order.
    pub fn lookups(&self) -> Vec<JobName> {
        self.inner.lock().lookups.clone()
    }

    fn check_error(&self) -> Result<(), RegistryError> {
        match &self.inner.lock().error {
            Some(message) => Err(RegistryError::Backend(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl JobRegistry for FakeJobRegistry {
    async fn lookup_job(&self, name: &JobName) -> Result<Option<JobHandle>, RegistryError> {
        let delay = {
            let mut state = self.inner.lock();
            state.lookups.push(name.clone());
            state.delay
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.check_error()?;

        let known = self.inner.lock().jobs.contains_key(name.as_str());
        Ok(known.then(|| JobHandle {
            name: name.clone(),
            key: name.as_str().to_string(),
        }))
    }

    async fn last_completed_run(
        &self,
        job: &JobHandle,
    ) -> Result<Option<CompletedRun>, RegistryError> {
        self.check_error()?;
        Ok(self
            .inner
            .lock()
            .jobs
            .get(job.name.as_str())
            .and_then(|run| run.clone()))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
