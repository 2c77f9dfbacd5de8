// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime: owns the registered triggers and drives their timers.

use std::time::{Duration, Instant};

use indexmap::IndexMap;
use parking_lot::Mutex;

use gl_adapters::{BuildScheduler, JobRegistry};
use gl_core::{Clock, IdGen, ScheduleSpec, TimerId};

use crate::scheduler::Scheduler;
use crate::trigger::{TickOutcome, TriggerGate};

struct RegisteredTrigger<R, B, C, G> {
    gate: TriggerGate<R, B, C, G>,
    schedule: ScheduleSpec,
}

/// Holds every registered trigger and the timer wheel that drives them.
///
/// Ticks run sequentially: the caller drains [`fired_timers`] and feeds each
/// id to [`handle_timer`] in turn. A trigger is re-armed from the schedule
/// only after its tick completes, so fire times that pass during a slow
/// evaluation are skipped rather than queued.
///
/// [`fired_timers`]: GateRuntime::fired_timers
/// [`handle_timer`]: GateRuntime::handle_timer
pub struct GateRuntime<R, B, C, G> {
    triggers: IndexMap<String, RegisteredTrigger<R, B, C, G>>,
    scheduler: Mutex<Scheduler>,
    clock: C,
}

impl<R, B, C, G> GateRuntime<R, B, C, G>
where
    R: JobRegistry,
    B: BuildScheduler,
    C: Clock,
    G: IdGen,
{
    pub fn new(clock: C) -> Self {
        Self {
            triggers: IndexMap::new(),
            scheduler: Mutex::new(Scheduler::new()),
            clock,
        }
    }

    /// Register a trigger and arm its first deadline.
    pub fn register(&mut self, gate: TriggerGate<R, B, C, G>, schedule: ScheduleSpec) {
        let name = gate.name().to_string();
        tracing::info!(trigger = %name, schedule = %schedule, "trigger registered");
        self.arm(&name, &schedule);
        self.triggers.insert(name, RegisteredTrigger { gate, schedule });
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Drain the timers that have come due.
    pub fn fired_timers(&self) -> Vec<TimerId> {
        self.scheduler.lock().fired_timers(self.clock.now())
    }

    /// Earliest pending deadline, if any trigger is still armed.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.lock().next_deadline()
    }

    pub fn has_timers(&self) -> bool {
        self.scheduler.lock().has_timers()
    }

    /// Run the tick for a fired timer and re-arm the trigger's schedule.
    ///
    /// Returns `None` for timer ids that do not map to a registered trigger.
    pub async fn handle_timer(&self, id: &TimerId) -> Option<TickOutcome> {
        let Some(name) = id.trigger_name() else {
            tracing::warn!(timer = %id, "timer fired without a trigger name");
            return None;
        };
        let Some(entry) = self.triggers.get(name) else {
            tracing::warn!(timer = %id, "timer fired for unknown trigger");
            return None;
        };

        let outcome = entry.gate.tick().await;
        self.arm(name, &entry.schedule);
        Some(outcome)
    }

    /// Tick every registered trigger once, in registration order.
    pub async fn tick_all(&self) -> Vec<(String, TickOutcome)> {
        let mut outcomes = Vec::with_capacity(self.triggers.len());
        for (name, entry) in &self.triggers {
            outcomes.push((name.clone(), entry.gate.tick().await));
        }
        outcomes
    }

    fn arm(&self, name: &str, schedule: &ScheduleSpec) {
        let now_utc = self.clock.now_utc();
        let Some(next) = schedule.next_after(now_utc) else {
            tracing::warn!(trigger = name, "schedule never fires again; trigger disarmed");
            return;
        };
        let delay = (next - now_utc).to_std().unwrap_or(Duration::ZERO);
        self.scheduler.lock().set_timer(
            TimerId::tick(name).as_str().to_string(),
            delay,
            self.clock.now(),
        );
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
