// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A single trigger's gate: evaluate upstreams, fire the downstream build.

use std::sync::atomic::{AtomicBool, Ordering};

use gl_adapters::{BuildScheduler, JobRegistry};
use gl_core::{Clock, GateResult, IdGen, TriggerCause};

use crate::error::EngineError;
use crate::evaluator::GateEvaluator;

/// What a single evaluation tick amounted to.
#[derive(Debug)]
pub enum TickOutcome {
    /// The gate passed and the downstream build was handed off.
    Triggered(TriggerCause),
    /// At least one upstream disqualified the gate; nothing was scheduled.
    Held(GateResult),
    /// A previous tick was still evaluating, so this one was dropped.
    Overlapped,
    /// Evaluation or scheduling hit an infrastructure fault.
    Faulted(EngineError),
}

/// One configured trigger: a name, its upstream gate, and the downstream
/// build to schedule when the gate passes.
///
/// `tick` is re-entrancy safe: a tick that arrives while an earlier one is
/// still evaluating is dropped, never queued.
pub struct TriggerGate<R, B, C, G> {
    name: String,
    evaluator: GateEvaluator<R>,
    builds: B,
    clock: C,
    ids: G,
    evaluating: AtomicBool,
}

/// Clears the in-flight flag when a tick unwinds, early return included.
struct ResetToIdle<'a>(&'a AtomicBool);

impl Drop for ResetToIdle<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl<R, B, C, G> TriggerGate<R, B, C, G>
where
    R: JobRegistry,
    B: BuildScheduler,
    C: Clock,
    G: IdGen,
{
    pub fn new(
        name: impl Into<String>,
        evaluator: GateEvaluator<R>,
        builds: B,
        clock: C,
        ids: G,
    ) -> Self {
        Self {
            name: name.into(),
            evaluator,
            builds,
            clock,
            ids,
            evaluating: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one evaluation tick with tracing.
    pub async fn tick(&self) -> TickOutcome {
        let span = tracing::info_span!("tick", trigger = %self.name);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let outcome = self.tick_inner().await;
        let elapsed = start.elapsed();

        match &outcome {
            TickOutcome::Triggered(cause) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                cause = %cause.id,
                "downstream build scheduled"
            ),
            TickOutcome::Held(result) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                consulted = result.consulted.len(),
                "gate held"
            ),
            TickOutcome::Overlapped => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "tick dropped: previous evaluation still in progress"
            ),
            TickOutcome::Faulted(e) => tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "tick faulted"
            ),
        }

        outcome
    }

    async fn tick_inner(&self) -> TickOutcome {
        if self
            .evaluating
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Acquire)
            .is_err()
        {
            return TickOutcome::Overlapped;
        }
        let _reset = ResetToIdle(&self.evaluating);

        let result = match self.evaluator.evaluate().await {
            Ok(result) => result,
            Err(e) => return TickOutcome::Faulted(e.into()),
        };

        match TriggerCause::from_gate(&self.name, &result, &self.ids, self.clock.epoch_ms()) {
            Some(cause) => {
                tracing::info!(cause = %cause.id, "gate passed; scheduling downstream build");
                if let Err(e) = self.builds.schedule_build(&cause).await {
                    return TickOutcome::Faulted(e.into());
                }
                TickOutcome::Triggered(cause)
            }
            None => {
                for dep in result.consulted.iter().filter(|d| !d.satisfies_gate()) {
                    tracing::info!(
                        upstream = %dep.name,
                        outcome = %dep.outcome,
                        found = dep.found,
                        "gate held by upstream"
                    );
                }
                TickOutcome::Held(result)
            }
        }
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
