// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! TimerId uniquely identifies a timer instance. The daemon arms one tick
//! timer per configured trigger; the prefix keeps them distinguishable from
//! any future timer kinds in logs.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a timer instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub String);

impl TimerId {
    /// Create a new TimerId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this TimerId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Timer ID for a trigger's next scheduled evaluation.
    pub fn tick(trigger: &str) -> Self {
        Self::new(format!("tick:{}", trigger))
    }

    /// Returns true if this is a trigger tick timer.
    pub fn is_tick(&self) -> bool {
        self.0.starts_with("tick:")
    }

    /// Extracts the trigger name if this is a tick timer.
    pub fn trigger_name(&self) -> Option<&str> {
        self.0.strip_prefix("tick:")
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TimerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TimerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for TimerId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TimerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for TimerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
