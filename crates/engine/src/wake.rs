// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Early cancellation of a `BackingOff` tenant slot on a pub/sub "new job"
//! signal (SPEC_FULL.md §4.2, §4.5).

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::select_all;
use jobq_core::{QueueName, TenantId};
use jobq_store::BackingStore;

#[async_trait]
pub trait WakeSource: Send + Sync {
    /// Resolves when a wake signal for `tenant` arrives. A source with
    /// nothing to report should never resolve, so it only ever loses the
    /// race against the distributor's own poll timer.
    async fn wait_for_wake(&self, tenant: &TenantId);
}

/// Production `WakeSource`: subscribes to `BackingStore::subscribe_wake` for
/// every queue it is configured with and resolves on the first signal. This
/// is the default wake source — wire it up wherever a `JobDistributor` is
/// constructed against a real `BackingStore`; reach for `NoWake` only when
/// there genuinely is no pub/sub layer to subscribe to.
pub struct BackingStoreWakeSource {
    store: Arc<dyn BackingStore>,
    queues: Vec<QueueName>,
}

impl BackingStoreWakeSource {
    /// `queues` is the set of queues this worker's tenants are known to use
    /// — `subscribe_wake` is per `(tenant, queue)`, so a tenant-wide wake
    /// wait races one subscription per queue in that set.
    pub fn new(store: Arc<dyn BackingStore>, queues: Vec<QueueName>) -> Self {
        Self { store, queues }
    }
}

#[async_trait]
impl WakeSource for BackingStoreWakeSource {
    async fn wait_for_wake(&self, tenant: &TenantId) {
        if self.queues.is_empty() {
            std::future::pending::<()>().await;
            return;
        }
        let mut receivers = Vec::with_capacity(self.queues.len());
        for queue in &self.queues {
            receivers.push(self.store.subscribe_wake(tenant, queue).await);
        }
        let waits = receivers.into_iter().map(|mut rx| Box::pin(async move { let _ = rx.recv().await; }));
        select_all(waits).await;
    }
}

/// No wake signal is wired up; the distributor falls back to pure polling
/// until its `Timer` fires. Correct, but gives up the "resume immediately
/// on new work" half of SPEC_FULL.md §4.2's scheduling contract — use only
/// when no `BackingStore` pub/sub is available.
pub struct NoWake;

#[async_trait]
impl WakeSource for NoWake {
    async fn wait_for_wake(&self, _tenant: &TenantId) {
        std::future::pending::<()>().await;
    }
}

/// Test wake source triggered explicitly, paired with `ManualTimer`.
#[cfg(any(test, feature = "test-support"))]
pub struct ManualWake {
    notify: tokio::sync::Notify,
}

#[cfg(any(test, feature = "test-support"))]
impl ManualWake {
    pub fn new() -> Self {
        Self { notify: tokio::sync::Notify::new() }
    }

    pub fn fire(&self) {
        self.notify.notify_waiters();
    }
}

#[cfg(any(test, feature = "test-support"))]
impl Default for ManualWake {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-support"))]
#[async_trait]
impl WakeSource for ManualWake {
    async fn wait_for_wake(&self, _tenant: &TenantId) {
        self.notify.notified().await;
    }
}
