// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-worker fair fetch+dispatch loop (SPEC_FULL.md §4.2).
//!
//! Cooperative and single-threaded in the sense that one `run()` call drives
//! one round-robin sweep over its tenants; multiple `JobDistributor`s run
//! independently, coordinating only through the `BackingStore`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use jobq_core::{AckToken, Clock, Job, TenantId};
use jobq_store::JobRepository;
use tokio::task::JoinSet;

use crate::error::DistributorError;
use crate::error_sink::{EngineError, ErrorSink};
use crate::outcome::{BoxFuture, FetchOutcome};
use crate::tenant_source::TenantSource;
use crate::timer::Timer;
use crate::wake::WakeSource;

/// A claimed job paired with the token its eventual acknowledge needs.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub job: Job,
    pub token: AckToken,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, tenant: &TenantId) -> Result<FetchOutcome<Dispatch>, DistributorError>;
}

/// Default `Fetcher`: claims directly against a `JobRepository`.
pub struct RepositoryFetcher<C: Clock> {
    repository: Arc<JobRepository>,
    clock: C,
    stale_after_ms: i64,
}

impl<C: Clock> RepositoryFetcher<C> {
    pub fn new(repository: Arc<JobRepository>, clock: C, stale_after_ms: i64) -> Self {
        Self { repository, clock, stale_after_ms }
    }
}

#[async_trait]
impl<C: Clock> Fetcher for RepositoryFetcher<C> {
    async fn fetch(&self, tenant: &TenantId) -> Result<FetchOutcome<Dispatch>, DistributorError> {
        let now = self.clock.epoch_ms();
        match self.repository.claim(tenant, now, self.stale_after_ms).await? {
            Some((job, token)) => Ok(FetchOutcome::Success(Dispatch { job, token })),
            None => Ok(FetchOutcome::Empty),
        }
    }
}

/// The user's job handler. Returning `Err` is this system's analogue of a
/// thrown exception (SPEC_FULL.md §4.2 error policy): the slot is released,
/// the job is left in `processing` for the `StaleChecker`, and the message
/// goes to the `ErrorSink`. The handler is responsible for calling its own
/// `Acknowledger` — the distributor never auto-acknowledges.
pub type WorkFn = Arc<dyn Fn(Job, TenantId, AckToken) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

pub struct JobDistributor {
    fetcher: Arc<dyn Fetcher>,
    work: WorkFn,
    tenant_source: parking_lot::Mutex<Box<dyn TenantSource>>,
    max_jobs: usize,
    timer: Arc<dyn Timer>,
    wake: Arc<dyn WakeSource>,
    error_sink: Arc<dyn ErrorSink>,
    poll_interval_ms: i64,
    stop: AtomicBool,
}

impl JobDistributor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        work: WorkFn,
        tenant_source: Box<dyn TenantSource>,
        max_jobs: usize,
        timer: Arc<dyn Timer>,
        wake: Arc<dyn WakeSource>,
        error_sink: Arc<dyn ErrorSink>,
        poll_interval_ms: i64,
    ) -> Self {
        Self {
            fetcher,
            work,
            tenant_source: parking_lot::Mutex::new(tenant_source),
            max_jobs: max_jobs.max(1),
            timer,
            wake,
            error_sink,
            poll_interval_ms,
            stop: AtomicBool::new(false),
        }
    }

    /// Signals all loops to stop. In-flight `work` calls are allowed to
    /// finish — `run()` drains them before returning.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub async fn run(&self) -> Result<(), DistributorError> {
        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.max_jobs));
        let mut joinset = JoinSet::new();

        while !self.stop.load(Ordering::SeqCst) {
            let tenants = self.tenant_source.lock().next_batch();
            let mut any_success = false;

            for tenant in &tenants {
                if self.stop.load(Ordering::SeqCst) {
                    break;
                }

                let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                    break;
                };

                match self.fetcher.fetch(tenant).await? {
                    FetchOutcome::Success(Dispatch { job, token }) => {
                        any_success = true;
                        let work = Arc::clone(&self.work);
                        let error_sink = Arc::clone(&self.error_sink);
                        let tenant = tenant.clone();
                        let queue = job.queue.clone();
                        let job_id = job.id.clone();
                        joinset.spawn(async move {
                            let _permit = permit;
                            if let Err(message) = work(job, tenant.clone(), token).await {
                                error_sink.report(EngineError::Processor { tenant, queue, job_id, message }).await;
                            }
                        });
                    }
                    FetchOutcome::Empty | FetchOutcome::Retry => drop(permit),
                    FetchOutcome::Wait(fut) => {
                        // Waiting is not counted against maxJobs (SPEC_FULL.md §4.2), so the
                        // permit is released up front; the awaitable is still spawned rather
                        // than awaited in-place, so other tenants are not blocked on it.
                        drop(permit);
                        joinset.spawn(fut);
                    }
                }
            }

            while joinset.try_join_next().is_some() {}

            if !any_success {
                let backoff_tenant = tenants.first().cloned().unwrap_or_default();
                tokio::select! {
                    _ = self.timer.sleep_ms(self.poll_interval_ms) => {}
                    _ = self.wake.wait_for_wake(&backoff_tenant) => {}
                }
            }
        }

        while joinset.join_next().await.is_some() {}
        Ok(())
    }
}

#[cfg(test)]
#[path = "distributor_tests.rs"]
mod tests;
