// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finalizes a claimed job (SPEC_FULL.md §4.3, §9 "Acknowledger opts bag →
//! explicit record").

use std::sync::Arc;

use jobq_core::{AckToken, Clock};
use jobq_store::{AckOutcome, JobRepository, StoreError};

/// Extensible but every field has a named effect — no arbitrary key bag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AckOptions {
    /// Terminates a repeating job even if `maxTimes` was not reached.
    pub dont_reschedule: bool,
}

pub struct Acknowledger<C: Clock> {
    repository: Arc<JobRepository>,
    clock: C,
}

impl<C: Clock> Acknowledger<C> {
    pub fn new(repository: Arc<JobRepository>, clock: C) -> Self {
        Self { repository, clock }
    }

    pub async fn acknowledge(&self, token: AckToken, opts: AckOptions) -> Result<AckOutcome, StoreError> {
        let now = self.clock.epoch_ms();
        let result = self.repository.acknowledge(token, opts.dont_reschedule, now).await?;
        Ok(result.outcome)
    }
}

impl<C: Clock> Clone for Acknowledger<C> {
    fn clone(&self) -> Self {
        Self { repository: Arc::clone(&self.repository), clock: self.clock.clone() }
    }
}

#[cfg(test)]
#[path = "acknowledger_tests.rs"]
mod tests;
