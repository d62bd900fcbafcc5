// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Public enqueue-side API; owns the background `StaleChecker` loop
//! (SPEC_FULL.md §6 "Producer API").

use std::sync::Arc;

use jobq_core::{Clock, Job, JobId, QueueName, TenantId};
use jobq_store::{BackingStore, EnqueueResult, JobRepository, StoreError};
use tokio::task::JoinHandle;

use crate::config::StaleCheckerConfig;
use crate::error_sink::ErrorSink;
use crate::stale_checker::StaleChecker;
use crate::timer::Timer;
use crate::wake::{BackingStoreWakeSource, WakeSource};

pub struct Producer<C: Clock> {
    store: Arc<dyn BackingStore>,
    repository: Arc<JobRepository>,
    clock: C,
    stale_checker: Arc<StaleChecker<C>>,
    stale_checker_handle: parking_lot::Mutex<Option<JoinHandle<()>>>,
}

impl<C: Clock> Producer<C> {
    pub fn new(
        store: Arc<dyn BackingStore>,
        clock: C,
        stale_checker_config: StaleCheckerConfig,
        error_sink: Arc<dyn ErrorSink>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        let repository = Arc::new(JobRepository::with_default_schedules(Arc::clone(&store)));
        let stale_checker =
            Arc::new(StaleChecker::new(Arc::clone(&repository), clock.clone(), stale_checker_config, error_sink, timer));
        let handle = {
            let stale_checker = Arc::clone(&stale_checker);
            tokio::spawn(async move { stale_checker.run().await })
        };
        Self { store, repository, clock, stale_checker, stale_checker_handle: parking_lot::Mutex::new(Some(handle)) }
    }

    pub fn repository(&self) -> &Arc<JobRepository> {
        &self.repository
    }

    /// The default `WakeSource` for a `JobDistributor` reading from this
    /// producer's `BackingStore` — subscribes to every queue in `queues`.
    pub fn wake_source(&self, queues: Vec<QueueName>) -> Arc<dyn WakeSource> {
        Arc::new(BackingStoreWakeSource::new(Arc::clone(&self.store), queues))
    }

    pub fn stale_checker(&self) -> &Arc<StaleChecker<C>> {
        &self.stale_checker
    }

    pub async fn enqueue(&self, job: &Job) -> Result<EnqueueResult, StoreError> {
        let now = self.clock.epoch_ms();
        self.repository.enqueue(job, now).await
    }

    pub async fn find_by_id(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<Option<Job>, StoreError> {
        self.repository.find_by_id(tenant, queue, id).await
    }

    pub async fn delete(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<bool, StoreError> {
        self.repository.delete(tenant, queue, id).await
    }

    pub async fn invoke(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<bool, StoreError> {
        let now = self.clock.epoch_ms();
        self.repository.invoke(tenant, queue, id, now).await
    }

    /// Stops the background `StaleChecker` loop and waits for it to exit.
    /// Idempotent — a second call finds the handle already taken.
    pub async fn close(&self) {
        self.stale_checker.stop();
        let handle = self.stale_checker_handle.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "producer_tests.rs"]
mod tests;
