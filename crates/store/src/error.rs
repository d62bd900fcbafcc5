// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use jobq_core::JobqError;

/// Failures surfaced by `JobRepository` transitions and the `BackingStore`
/// they run against.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `enqueue` attempted on an identity whose fingerprint is currently
    /// claimed (see SPEC_FULL.md §9, resolved Open Question).
    #[error("queue is locked: an exclusive job is in processing")]
    QueueLocked,

    /// The fingerprint is not present in the set the transition expected it
    /// in — either it never existed, a race beat this caller to it, or it
    /// was already finalized.
    #[error("job not found")]
    NotFound,

    /// `acknowledge` observed a `count` that no longer matches the live job
    /// record: another path (a stale reclaim) already finalized this claim.
    #[error("ack token is stale")]
    StaleAck,

    /// The backing store itself failed (a network blip against a real
    /// transport). The reference in-memory store never returns this.
    #[error("transient backing-store error: {0}")]
    TransientStoreError(String),

    #[error(transparent)]
    Jobq(#[from] JobqError),
}
