// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Downstream build submission adapters

mod command;
mod noop;

pub use command::CommandBuildScheduler;
pub use noop::NoOpBuildScheduler;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeBuildScheduler;

use async_trait::async_trait;
use gl_core::TriggerCause;
use thiserror::Error;

/// Errors from build submission
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to launch build command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("build command exited with code {code}")]
    CommandFailed { code: i32, stderr: String },

    #[error("cause encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("submission failed: {0}")]
    SubmitFailed(String),
}

/// Adapter for scheduling the downstream build
#[async_trait]
pub trait BuildScheduler: Clone + Send + Sync + 'static {
    /// Submit one downstream build, carrying `cause` as its audit record.
    async fn schedule_build(&self, cause: &TriggerCause) -> Result<(), BuildError>;
}
