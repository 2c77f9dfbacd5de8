// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal run outcomes, ordered by severity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a completed run, least severe first.
///
/// `NotBuilt` marks a job with no completed run and sorts worse than every
/// real outcome. In-progress runs never produce an outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    Success,
    Unstable,
    Failure,
    Aborted,
    NotBuilt,
}

impl RunOutcome {
    /// True if this outcome is strictly more severe than `other`.
    pub fn is_worse_than(self, other: RunOutcome) -> bool {
        self > other
    }

    /// True if a gate admits this outcome. Only `Success` does.
    pub fn is_success(self) -> bool {
        matches!(self, RunOutcome::Success)
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Success => write!(f, "SUCCESS"),
            RunOutcome::Unstable => write!(f, "UNSTABLE"),
            RunOutcome::Failure => write!(f, "FAILURE"),
            RunOutcome::Aborted => write!(f, "ABORTED"),
            RunOutcome::NotBuilt => write!(f, "NOT_BUILT"),
        }
    }
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod tests;
