// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Greenlight gate engine
//!
//! Evaluates fan-in build gates: on each tick a trigger resolves its
//! upstream jobs' latest completed outcomes, and when every one is green
//! it schedules the downstream build exactly once.

mod error;
mod evaluator;
mod resolver;
mod runtime;
mod scheduler;
mod trigger;

pub use error::EngineError;
pub use evaluator::GateEvaluator;
pub use resolver::UpstreamResolver;
pub use runtime::GateRuntime;
pub use scheduler::Scheduler;
pub use trigger::{TickOutcome, TriggerGate};
