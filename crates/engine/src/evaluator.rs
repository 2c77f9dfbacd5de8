// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Gate evaluation over a fixed list of upstream jobs.

use gl_adapters::{JobRegistry, RegistryError};
use gl_core::{GateResult, JobName};

use crate::resolver::UpstreamResolver;

/// Evaluates the gate for one trigger by consulting every configured
/// upstream job, in order, and collecting the verdict.
///
/// Every upstream is consulted even after a disqualifying outcome is
/// seen, so the resulting [`GateResult`] always reports the full
/// picture. Duplicate names are resolved independently.
pub struct GateEvaluator<R> {
    resolver: UpstreamResolver<R>,
    upstream: Vec<JobName>,
}

impl<R: JobRegistry> GateEvaluator<R> {
    pub fn new(registry: R, upstream: Vec<JobName>) -> Self {
        Self { resolver: UpstreamResolver::new(registry), upstream }
    }

    pub fn upstream(&self) -> &[JobName] {
        &self.upstream
    }

    pub async fn evaluate(&self) -> Result<GateResult, RegistryError> {
        let mut consulted = Vec::with_capacity(self.upstream.len());
        for name in &self.upstream {
            consulted.push(self.resolver.resolve(name).await?);
        }
        Ok(GateResult::from_consulted(consulted))
    }
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
