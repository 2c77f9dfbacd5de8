// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build scheduler for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildError, BuildScheduler};
use async_trait::async_trait;
use gl_core::TriggerCause;
use parking_lot::Mutex;
use std::sync::Arc;

struct FakeBuildState {
    scheduled: Vec<TriggerCause>,
    error: Option<String>,
}

/// Fake build scheduler for testing
#[derive(Clone)]
pub struct FakeBuildScheduler {
    inner: Arc<Mutex<FakeBuildState>>,
}

impl Default for FakeBuildScheduler {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeBuildState {
                scheduled: Vec::new(),
                error: None,
            })),
        }
    }
}

impl FakeBuildScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Causes submitted so far, in order.
    pub fn scheduled(&self) -> Vec<TriggerCause> {
        self.inner.lock().scheduled.clone()
    }

    /// Make every subsequent submission fail with `message`.
    pub fn fail_with(&self, message: &str) {
        self.inner.lock().error = Some(message.to_string());
    }
}

#[async_trait]
impl BuildScheduler for FakeBuildScheduler {
    async fn schedule_build(&self, cause: &TriggerCause) -> Result<(), BuildError> {
        let mut state = self.inner.lock();
        if let Some(message) = &state.error {
            return Err(BuildError::SubmitFailed(message.clone()));
        }
        state.scheduled.push(cause.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
