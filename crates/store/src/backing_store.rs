// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The atomic-scripted capability a backing store must provide
//! (SPEC_FULL.md §6). `JobRepository` is the only caller; every method here
//! is the sole writer for its transition.

use async_trait::async_trait;
use jobq_core::{Fingerprint, JobId, QueueName, TenantId};
use tokio::sync::broadcast;

use crate::activity::ActivityEvent;
use crate::error::StoreError;
use crate::record::JobRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Created,
    Replaced,
}

#[derive(Debug, Clone)]
pub struct ClaimedJob {
    pub record: JobRecord,
    pub fingerprint: Fingerprint,
    pub count: i64,
}

/// What `JobRepository` decided to do with an acknowledged job, computed
/// with the help of `ScheduleMap` before the script is invoked (`jobq-core`
/// is not a dependency of the store's write path otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckDecision {
    Finalize,
    Reschedule { run_at: i64, last_fire_time: i64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    Applied,
    /// The token's `count` no longer matched the live record — another path
    /// (a stale reclaim) already finalized this claim.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleOutcome {
    Rescheduled { fingerprint: Fingerprint, tenant: TenantId, queue: QueueName, id: JobId, next_retry_at: i64 },
    TimedOut { fingerprint: Fingerprint, tenant: TenantId, queue: QueueName, id: JobId },
}

#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Write `job:{fp}`, place in `scheduled` or `pending` depending on
    /// `run_at` vs `now`, add the id to `queue:{queue}:ids`. Replaces in
    /// place (repositioning) if the identity is already live.
    async fn enqueue(&self, record: JobRecord, now: i64) -> Result<EnqueueOutcome, StoreError>;

    /// Move up to `limit` due fingerprints from `scheduled` into `pending`.
    /// Returns the count moved.
    async fn promote_due(&self, now: i64, limit: usize) -> Result<usize, StoreError>;

    /// Pop one fingerprint belonging to `tenant` from `pending`, move it to
    /// `processing` with deadline `now + stale_after`, and increment `count`.
    async fn claim(&self, tenant: &TenantId, now: i64, stale_after: i64) -> Result<Option<ClaimedJob>, StoreError>;

    /// Apply `decision` to the job at `fingerprint`, but only if its live
    /// `count` still equals `expected_count`.
    async fn acknowledge(
        &self,
        fingerprint: Fingerprint,
        expected_count: i64,
        decision: AckDecision,
    ) -> Result<AckOutcome, StoreError>;

    /// Reclaim every `processing` entry whose deadline has passed.
    async fn report_stale(&self, now: i64) -> Result<Vec<StaleOutcome>, StoreError>;

    async fn find_by_id(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<Option<JobRecord>, StoreError>;

    /// Read-only lookup by fingerprint, used by `JobRepository::acknowledge`
    /// to inspect a job's schedule before deciding the `AckDecision`.
    async fn find_by_fingerprint(&self, fingerprint: Fingerprint) -> Result<Option<JobRecord>, StoreError>;

    /// Only defined for jobs not currently in `processing`.
    async fn delete(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<bool, StoreError>;

    /// Force-promote a job from `scheduled` straight into `pending`.
    async fn invoke(&self, tenant: &TenantId, queue: &QueueName, id: &JobId, now: i64) -> Result<bool, StoreError>;

    async fn subscribe_activity(&self, tenant: &TenantId) -> broadcast::Receiver<ActivityEvent>;

    /// Cancels a `JobDistributor`'s backoff timer early. Payload-free.
    async fn subscribe_wake(&self, tenant: &TenantId, queue: &QueueName) -> broadcast::Receiver<()>;
}
