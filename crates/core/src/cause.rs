// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Audit record for a fired trigger.

use crate::{GateResult, IdGen, RunRef};
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a trigger cause.
    pub struct CauseId;
}

/// Why a downstream build was scheduled.
///
/// Only a passing gate produces a cause. `consulted` lists the runs that
/// backed the verdict, in consultation order; upstreams resolved without a
/// completed run contribute no entry (a passing gate never has any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCause {
    pub id: CauseId,
    /// Name of the trigger that fired.
    pub trigger: String,
    /// Runs consulted, in order.
    pub consulted: Vec<RunRef>,
    /// Wall-clock time the gate passed.
    pub at_epoch_ms: u64,
}

impl TriggerCause {
    /// Build a cause from a gate verdict. Returns `None` unless the gate
    /// passed.
    pub fn from_gate(
        trigger: &str,
        result: &GateResult,
        ids: &impl IdGen,
        at_epoch_ms: u64,
    ) -> Option<Self> {
        if !result.passed {
            return None;
        }
        Some(Self {
            id: CauseId::new(ids.next()),
            trigger: trigger.to_string(),
            consulted: result.consulted_runs(),
            at_epoch_ms,
        })
    }

    /// Short human description for logs and build records.
    pub fn short_description(&self) -> String {
        if self.consulted.is_empty() {
            return "upstream runs green (none consulted)".to_string();
        }
        let runs: Vec<&str> = self
            .consulted
            .iter()
            .map(|r| r.display_name.as_str())
            .collect();
        format!("upstream runs green: {}", runs.join(", "))
    }
}

impl fmt::Display for TriggerCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_description())
    }
}

#[cfg(test)]
#[path = "cause_tests.rs"]
mod tests;
