// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron schedule parsing and validation.
//!
//! Accepts five-field crontab expressions (minute granularity) and six- or
//! seven-field expressions with an explicit seconds column. Parse failures
//! are hard errors; [`ScheduleSpec::check_sanity`] surfaces advisory
//! warnings that never block acceptance.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors from schedule parsing
#[derive(Debug, Error)]
pub enum ScheduleParseError {
    #[error("empty schedule expression")]
    Empty,

    #[error("invalid cron expression '{expression}': {message}")]
    Invalid { expression: String, message: String },
}

/// A validated cron schedule.
///
/// Construct only through [`ScheduleSpec::parse`]; holding a value implies
/// the expression was accepted.
#[derive(Debug, Clone)]
pub struct ScheduleSpec {
    expression: String,
    schedule: cron::Schedule,
}

impl ScheduleSpec {
    /// Parse a cron expression.
    ///
    /// Five-field expressions are normalized by prepending a `0` seconds
    /// column, so `*/5 * * * *` fires at second zero of matching minutes.
    pub fn parse(expression: &str) -> Result<Self, ScheduleParseError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(ScheduleParseError::Empty);
        }

        let normalized = if trimmed.split_whitespace().count() == 5 {
            format!("0 {trimmed}")
        } else {
            trimmed.to_string()
        };

        let schedule =
            cron::Schedule::from_str(&normalized).map_err(|e| ScheduleParseError::Invalid {
                expression: trimmed.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            expression: trimmed.to_string(),
            schedule,
        })
    }

    /// The expression as configured (trimmed, not normalized).
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Next fire time strictly after `t`, or `None` if the schedule never
    /// fires again.
    pub fn next_after(&self, t: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&t).next()
    }

    /// Advisory warning for schedules that parse but rarely make sense.
    ///
    /// Returns `None` when the schedule looks reasonable.
    pub fn check_sanity(&self) -> Option<String> {
        if self.schedule.upcoming(Utc).next().is_none() {
            return Some("schedule never fires".to_string());
        }

        let fields: Vec<&str> = self.expression.split_whitespace().collect();
        let (seconds, minutes) = match fields.len() {
            5 => (None, fields[0]),
            _ => (Some(fields[0]), fields[1]),
        };

        if seconds == Some("*") {
            return Some(
                "schedule fires every second; give the seconds field a fixed value".to_string(),
            );
        }
        if minutes == "*" {
            return Some(
                "schedule fires every minute; use an interval like */5 if that is not intended"
                    .to_string(),
            );
        }
        None
    }
}

impl fmt::Display for ScheduleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
