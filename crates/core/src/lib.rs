// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! gl-core: Core library for the Greenlight (gl) build gate

pub mod cause;
pub mod clock;
pub mod gate;
pub mod id;
pub mod job;
pub mod outcome;
pub mod schedule;
pub mod timer;

pub use cause::{CauseId, TriggerCause};
pub use clock::{Clock, FakeClock, SystemClock};
pub use gate::{GateResult, ResolvedDependency};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use job::{JobName, RunId, RunRef};
pub use outcome::RunOutcome;
pub use schedule::{ScheduleParseError, ScheduleSpec};
pub use timer::TimerId;
