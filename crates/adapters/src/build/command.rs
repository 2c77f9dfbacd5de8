// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build scheduler that runs a shell command.
//!
//! The cause travels in the environment: `GL_TRIGGER` holds the trigger
//! name, `GL_CAUSE` the cause as JSON. The command runs under
//! `set -euo pipefail`; a non-zero exit fails the submission.

use super::{BuildError, BuildScheduler};
use async_trait::async_trait;
use gl_core::TriggerCause;

/// Schedules downstream builds by running a configured shell command.
#[derive(Debug, Clone)]
pub struct CommandBuildScheduler {
    command: String,
}

impl CommandBuildScheduler {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl BuildScheduler for CommandBuildScheduler {
    async fn schedule_build(&self, cause: &TriggerCause) -> Result<(), BuildError> {
        let cause_json = serde_json::to_string(cause)?;

        let wrapped = format!("set -euo pipefail\n{}", self.command);
        let output = tokio::process::Command::new("bash")
            .arg("-c")
            .arg(&wrapped)
            .env("GL_TRIGGER", &cause.trigger)
            .env("GL_CAUSE", &cause_json)
            .output()
            .await?;

        if !output.stdout.is_empty() {
            tracing::info!(
                trigger = %cause.trigger,
                stdout = %String::from_utf8_lossy(&output.stdout),
                "build command stdout"
            );
        }
        if !output.stderr.is_empty() {
            tracing::warn!(
                trigger = %cause.trigger,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "build command stderr"
            );
        }

        if output.status.success() {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
