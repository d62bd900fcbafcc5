// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binds a user processor function to a `JobDistributor`'s `WorkFn`
//! (SPEC_FULL.md §4.3).

use std::future::Future;
use std::sync::Arc;

use jobq_core::{AckToken, Clock, Job, TenantId};

use crate::acknowledger::{AckOptions, Acknowledger};
use crate::distributor::WorkFn;

/// Wraps `processor` so the distributor can drive it without knowing about
/// acknowledgement at all. `processor` receives the claimed job and its
/// `AckToken` and decides when (and with what options) to acknowledge —
/// the distributor never does this automatically (SPEC_FULL.md §4.3).
///
/// Returning `Err` from `processor` is equivalent to a thrown exception: the
/// job is left unacknowledged in `processing` for the `StaleChecker` to
/// reclaim, and the message is forwarded to the `ErrorSink`.
pub fn processor_work_fn<C, F, Fut>(acknowledger: Acknowledger<C>, processor: F) -> WorkFn
where
    C: Clock,
    F: Fn(Job, TenantId, AckToken, Acknowledger<C>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    Arc::new(move |job, tenant, token| {
        let acknowledger = acknowledger.clone();
        let fut = processor(job, tenant, token, acknowledger);
        Box::pin(fut)
    })
}

/// Convenience processor wrapper for the common case: the handler returns
/// whether to finalize without a reschedule, and this always acknowledges on
/// success. Handlers that need finer control should call their `Acknowledger`
/// directly and use `processor_work_fn`.
pub fn auto_ack_work_fn<C, F, Fut>(acknowledger: Acknowledger<C>, handler: F) -> WorkFn
where
    C: Clock,
    F: Fn(Job, TenantId) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AckOptions, String>> + Send + 'static,
{
    Arc::new(move |job, tenant, token| {
        let acknowledger = acknowledger.clone();
        Box::pin(async move {
            let opts = handler(job, tenant).await?;
            acknowledger.acknowledge(token, opts).await.map_err(|err| err.to_string())?;
            Ok(())
        })
    })
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
