// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reclaims timed-out `processing` entries (SPEC_FULL.md §4.4).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jobq_core::Clock;
use jobq_store::{JobRepository, StaleOutcome, StoreError};

use crate::config::{StaleCheckInterval, StaleCheckerConfig};
use crate::error_sink::{EngineError, ErrorSink};
use crate::timer::Timer;

pub struct StaleChecker<C: Clock> {
    repository: Arc<JobRepository>,
    clock: C,
    config: StaleCheckerConfig,
    error_sink: Arc<dyn ErrorSink>,
    timer: Arc<dyn Timer>,
    stop: AtomicBool,
}

impl<C: Clock> StaleChecker<C> {
    pub fn new(
        repository: Arc<JobRepository>,
        clock: C,
        config: StaleCheckerConfig,
        error_sink: Arc<dyn ErrorSink>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        Self { repository, clock, config, error_sink, timer, stop: AtomicBool::new(false) }
    }

    /// One scan pass: reclaims every timed-out `processing` entry. A job
    /// with a retry left is rescheduled quietly — that path is the normal
    /// way a job survives a crash, not a failure worth surfacing. Only a
    /// reclaim that exhausts the job's retries is reported, as
    /// `EngineError::JobTimedOut`. Returns the total number reclaimed.
    pub async fn check(&self) -> Result<usize, StoreError> {
        let now = self.clock.epoch_ms();
        let outcomes = self.repository.report_stale(now).await?;
        let count = outcomes.len();
        for outcome in outcomes {
            if let StaleOutcome::TimedOut { tenant, queue, id, .. } = outcome {
                self.error_sink
                    .report(EngineError::JobTimedOut { tenant, queue_id: queue, job_id: id, timestamp_for_next_retry: None })
                    .await;
            }
        }
        Ok(count)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Drives `check()` on `config.interval`. Returns immediately for
    /// `StaleCheckInterval::Manual` — tests call `check()` themselves.
    pub async fn run(&self) {
        let StaleCheckInterval::Periodic { ms } = self.config.interval else {
            return;
        };
        while !self.stop.load(Ordering::SeqCst) {
            if let Err(err) = self.check().await {
                tracing::error!(%err, "stale check failed");
            }
            self.timer.sleep_ms(ms).await;
        }
    }
}

#[cfg(test)]
#[path = "stale_checker_tests.rs"]
mod tests;
