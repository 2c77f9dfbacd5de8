// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Greenlight Daemon library
//!
//! This module exposes the configuration types for use by external tooling.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;

pub use config::{CheckStatus, ConfigError, DaemonConfig, TriggerConfig, TriggerReport};
