// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Re-emits pub/sub lifecycle events to a user callback (SPEC_FULL.md §4.5).
//! Delivery is best-effort: a lagging subscriber silently drops events rather
//! than blocking producers, matching the lossy pub/sub channel it sits on.

use std::sync::Arc;

use jobq_core::TenantId;
use jobq_store::{ActivityEvent, BackingStore};
use tokio::sync::broadcast::error::RecvError;

/// Subscribes to one tenant's activity channel and runs `callback` for each
/// event until the channel closes or `stop()` is called.
pub struct Activity {
    store: Arc<dyn BackingStore>,
}

impl Activity {
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self { store }
    }

    /// Runs until the subscriber is explicitly dropped by the caller
    /// cancelling this future — there is no separate stop handle, since the
    /// subscription itself is the only state to tear down.
    pub async fn watch<F>(&self, tenant: &TenantId, mut callback: F)
    where
        F: FnMut(ActivityEvent) + Send,
    {
        let mut receiver = self.store.subscribe_activity(tenant).await;
        loop {
            match receiver.recv().await {
                Ok(event) => callback(event),
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    }
}
