// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the gate engine

use gl_adapters::{BuildError, RegistryError};
use thiserror::Error;

/// Errors that fail a tick without stopping the scheduler
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("build submission error: {0}")]
    Build(#[from] BuildError),
}
