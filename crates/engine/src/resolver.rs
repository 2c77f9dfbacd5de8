// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream status resolution.

use gl_adapters::{JobRegistry, RegistryError};
use gl_core::{JobName, ResolvedDependency};

/// Resolves one upstream job name to its latest completed outcome.
#[derive(Debug, Clone)]
pub struct UpstreamResolver<R> {
    registry: R,
}

impl<R: JobRegistry> UpstreamResolver<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// Resolve an upstream's latest completed outcome.
    ///
    /// A missing job and a job with no completed run are verdicts, not
    /// errors; only registry faults propagate.
    pub async fn resolve(&self, name: &JobName) -> Result<ResolvedDependency, RegistryError> {
        let Some(job) = self.registry.lookup_job(name).await? else {
            tracing::warn!(upstream = %name, "upstream job not found");
            return Ok(ResolvedDependency::missing(name.clone()));
        };

        let Some(completed) = self.registry.last_completed_run(&job).await? else {
            tracing::info!(upstream = %name, "upstream job has no completed run");
            return Ok(ResolvedDependency::not_built(name.clone()));
        };

        tracing::debug!(
            upstream = %name,
            run = %completed.run,
            outcome = %completed.outcome,
            "resolved upstream"
        );
        Ok(ResolvedDependency::completed(
            name.clone(),
            completed.run,
            completed.outcome,
        ))
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
