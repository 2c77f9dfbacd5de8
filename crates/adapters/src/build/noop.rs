// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op build scheduler.

use super::{BuildError, BuildScheduler};
use async_trait::async_trait;
use gl_core::TriggerCause;

/// Build scheduler that logs the submission and does nothing else.
///
/// Used for dry runs: the gate evaluates and the cause is recorded in the
/// log, but no downstream build starts.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpBuildScheduler;

impl NoOpBuildScheduler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BuildScheduler for NoOpBuildScheduler {
    async fn schedule_build(&self, cause: &TriggerCause) -> Result<(), BuildError> {
        tracing::info!(
            trigger = %cause.trigger,
            cause_id = %cause.id,
            description = %cause.short_description(),
            "dry run: would schedule downstream build"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
