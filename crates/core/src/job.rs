// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream job and run identity types.

use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Name of an upstream job as configured.
    ///
    /// Comparison is exact and case-sensitive. Whitespace is trimmed at the
    /// configuration boundary, never here.
    pub struct JobName;
}

crate::define_id! {
    /// Registry-native identifier for a single run of a job.
    pub struct RunId;
}

/// Reference to a completed run, carried in causes and logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRef {
    pub id: RunId,
    /// Human-readable label, e.g. `deploy-api #142`.
    pub display_name: String,
}

impl RunRef {
    pub fn new(id: impl Into<RunId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

impl fmt::Display for RunRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
