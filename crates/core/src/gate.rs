// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate verdicts over resolved upstream dependencies.

use crate::{JobName, RunOutcome, RunRef};
use serde::{Deserialize, Serialize};

/// One upstream's resolution at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedDependency {
    pub name: JobName,
    pub outcome: RunOutcome,
    /// The run the outcome came from. `None` when the job is missing or has
    /// no completed run.
    pub run: Option<RunRef>,
    /// False when the registry does not know the job at all.
    pub found: bool,
}

impl ResolvedDependency {
    /// Resolution for a job the registry does not know.
    pub fn missing(name: JobName) -> Self {
        Self {
            name,
            outcome: RunOutcome::NotBuilt,
            run: None,
            found: false,
        }
    }

    /// Resolution for a known job with no completed run yet.
    pub fn not_built(name: JobName) -> Self {
        Self {
            name,
            outcome: RunOutcome::NotBuilt,
            run: None,
            found: true,
        }
    }

    /// Resolution for a known job whose latest completed run is `run`.
    pub fn completed(name: JobName, run: RunRef, outcome: RunOutcome) -> Self {
        Self {
            name,
            outcome,
            run: Some(run),
            found: true,
        }
    }

    /// True if this entry admits the gate: the job is known and its latest
    /// completed run succeeded.
    pub fn satisfies_gate(&self) -> bool {
        self.found && !self.outcome.is_worse_than(RunOutcome::Success)
    }
}

/// Verdict of one gate evaluation.
///
/// `consulted` preserves request order and is complete even when the gate
/// fails. Duplicate requests appear once per occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateResult {
    pub passed: bool,
    pub consulted: Vec<ResolvedDependency>,
}

impl GateResult {
    /// Compute the verdict from a full consultation list.
    ///
    /// An empty list passes vacuously. Callers that consider that a
    /// misconfiguration must reject it before evaluating.
    pub fn from_consulted(consulted: Vec<ResolvedDependency>) -> Self {
        let passed = consulted.iter().all(ResolvedDependency::satisfies_gate);
        Self { passed, consulted }
    }

    /// Runs that backed this verdict, in consultation order.
    ///
    /// Entries without a completed run contribute nothing.
    pub fn consulted_runs(&self) -> Vec<RunRef> {
        self.consulted.iter().filter_map(|d| d.run.clone()).collect()
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
