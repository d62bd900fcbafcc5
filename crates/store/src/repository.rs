// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `JobRepository`: encodes/decodes job records and drives the
//! `ScheduleEngine` round trip on top of a `BackingStore` (SPEC_FULL.md
//! §4.1, §4.6).

use std::sync::Arc;

use jobq_core::{AckToken, Job, JobId, QueueName, ScheduleMap, TenantId};

use crate::backing_store::{AckDecision, AckOutcome, BackingStore, ClaimedJob, EnqueueOutcome, StaleOutcome};
use crate::error::StoreError;
use crate::record::JobRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueResult {
    pub id: JobId,
    pub queue: QueueName,
    pub outcome: EnqueueOutcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AckResult {
    pub outcome: AckOutcome,
}

pub struct JobRepository {
    store: Arc<dyn BackingStore>,
    schedules: ScheduleMap,
}

impl JobRepository {
    pub fn new(store: Arc<dyn BackingStore>, schedules: ScheduleMap) -> Self {
        Self { store, schedules }
    }

    pub fn with_default_schedules(store: Arc<dyn BackingStore>) -> Self {
        Self::new(store, ScheduleMap::with_defaults())
    }

    pub async fn enqueue(&self, job: &Job, now: i64) -> Result<EnqueueResult, StoreError> {
        let outcome = self.store.enqueue(JobRecord::encode(job), now).await?;
        Ok(EnqueueResult { id: job.id.clone(), queue: job.queue.clone(), outcome })
    }

    pub async fn promote_due(&self, now: i64, limit: usize) -> Result<usize, StoreError> {
        self.store.promote_due(now, limit).await
    }

    pub async fn claim(&self, tenant: &TenantId, now: i64, stale_after: i64) -> Result<Option<(Job, AckToken)>, StoreError> {
        let Some(ClaimedJob { record, fingerprint, count }) = self.store.claim(tenant, now, stale_after).await? else {
            return Ok(None);
        };
        let job = record.decode()?;
        Ok(Some((job, AckToken { fingerprint, count })))
    }

    /// Verifies the token, then decides — via `ScheduleMap` — whether the
    /// job re-lives in `scheduled` or is finalized, per SPEC_FULL.md §4.1.
    pub async fn acknowledge(&self, token: AckToken, dont_reschedule: bool, now: i64) -> Result<AckResult, StoreError> {
        let Some(record) = self.store.find_by_fingerprint(token.fingerprint).await? else {
            return Ok(AckResult { outcome: AckOutcome::Stale });
        };
        let job = record.decode()?;
        if job.count != token.count {
            return Ok(AckResult { outcome: AckOutcome::Stale });
        }

        let decision = self.decide(&job, dont_reschedule, now)?;
        let outcome = match self.store.acknowledge(token.fingerprint, token.count, decision).await {
            Ok(outcome) => outcome,
            // A concurrent stale reclaim can finalize the record between our
            // read above and this call; treat it like any other stale ack.
            Err(StoreError::NotFound) => AckOutcome::Stale,
            Err(err) => return Err(err),
        };
        Ok(AckResult { outcome })
    }

    fn decide(&self, job: &Job, dont_reschedule: bool, now: i64) -> Result<AckDecision, StoreError> {
        if dont_reschedule || job.schedule_exhausted() {
            return Ok(AckDecision::Finalize);
        }
        let Some(schedule) = &job.schedule else {
            return Ok(AckDecision::Finalize);
        };
        let last = schedule.last_fire_time.unwrap_or(job.run_at);
        match self.schedules.next_fire(&schedule.kind, last, &schedule.meta)? {
            Some(run_at) => Ok(AckDecision::Reschedule { run_at, last_fire_time: now }),
            None => Ok(AckDecision::Finalize),
        }
    }

    pub async fn report_stale(&self, now: i64) -> Result<Vec<StaleOutcome>, StoreError> {
        self.store.report_stale(now).await
    }

    pub async fn find_by_id(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<Option<Job>, StoreError> {
        match self.store.find_by_id(tenant, queue, id).await? {
            Some(record) => Ok(Some(record.decode()?)),
            None => Ok(None),
        }
    }

    pub async fn delete(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<bool, StoreError> {
        self.store.delete(tenant, queue, id).await
    }

    pub async fn invoke(&self, tenant: &TenantId, queue: &QueueName, id: &JobId, now: i64) -> Result<bool, StoreError> {
        self.store.invoke(tenant, queue, id, now).await
    }

    pub fn backing_store(&self) -> &Arc<dyn BackingStore> {
        &self.store
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
