// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process reference `BackingStore`, guarded by a single
//! `parking_lot::Mutex`. Each public method is one atomic transition: the
//! lock is held only for the synchronous body, never across an `.await`
//! (SPEC_FULL.md §5).

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use jobq_core::{Fingerprint, JobId, QueueName, TenantId};
use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::activity::{ActivityEvent, JobSummary};
use crate::backing_store::{AckDecision, AckOutcome, BackingStore, ClaimedJob, EnqueueOutcome, StaleOutcome};
use crate::error::StoreError;
use crate::record::JobRecord;

const ACTIVITY_CHANNEL_CAPACITY: usize = 1024;
const WAKE_CHANNEL_CAPACITY: usize = 64;

type ScoreKey = (i64, u64);

struct Inner {
    jobs: HashMap<Fingerprint, JobRecord>,
    scheduled: BTreeMap<ScoreKey, Fingerprint>,
    scheduled_index: HashMap<Fingerprint, ScoreKey>,
    pending: VecDeque<Fingerprint>,
    pending_set: HashSet<Fingerprint>,
    processing: BTreeMap<ScoreKey, Fingerprint>,
    processing_index: HashMap<Fingerprint, ScoreKey>,
    queue_ids: HashMap<(TenantId, QueueName), HashSet<JobId>>,
    seq: u64,
    activity: HashMap<TenantId, broadcast::Sender<ActivityEvent>>,
    wake: HashMap<(TenantId, QueueName), broadcast::Sender<()>>,
}

impl Inner {
    fn new() -> Self {
        Self {
            jobs: HashMap::new(),
            scheduled: BTreeMap::new(),
            scheduled_index: HashMap::new(),
            pending: VecDeque::new(),
            pending_set: HashSet::new(),
            processing: BTreeMap::new(),
            processing_index: HashMap::new(),
            queue_ids: HashMap::new(),
            seq: 0,
            activity: HashMap::new(),
            wake: HashMap::new(),
        }
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn emit_activity(&mut self, tenant: &TenantId, event: ActivityEvent) {
        if let Some(tx) = self.activity.get(tenant) {
            let _ = tx.send(event);
        }
    }

    fn emit_wake(&mut self, tenant: &TenantId, queue: &QueueName) {
        if let Some(tx) = self.wake.get(&(tenant.clone(), queue.clone())) {
            let _ = tx.send(());
        }
    }

    fn unschedule(&mut self, fp: Fingerprint) {
        if let Some(key) = self.scheduled_index.remove(&fp) {
            self.scheduled.remove(&key);
        }
    }

    fn unpend(&mut self, fp: Fingerprint) {
        if self.pending_set.remove(&fp) {
            self.pending.retain(|f| *f != fp);
        }
    }

    fn unprocess(&mut self, fp: Fingerprint) {
        if let Some(key) = self.processing_index.remove(&fp) {
            self.processing.remove(&key);
        }
    }

    fn forget_job(&mut self, fp: Fingerprint, tenant: &TenantId, queue: &QueueName, id: &JobId) {
        self.jobs.remove(&fp);
        if let Some(ids) = self.queue_ids.get_mut(&(tenant.clone(), queue.clone())) {
            ids.remove(id);
        }
    }
}

/// The reference `BackingStore`: in-process, not a networked transport
/// (explicit non-goal — SPEC_FULL.md §1).
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: Mutex::new(Inner::new()) }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackingStore for MemoryStore {
    async fn enqueue(&self, record: JobRecord, now: i64) -> Result<EnqueueOutcome, StoreError> {
        let job = record.decode()?;
        let fp = job.fingerprint();
        let mut inner = self.inner.lock();

        if inner.processing_index.contains_key(&fp) {
            return Err(StoreError::QueueLocked);
        }
        if job.exclusive {
            let key = (job.tenant.clone(), job.queue.clone());
            if let Some(ids) = inner.queue_ids.get(&key) {
                let clashes = ids.iter().any(|id| {
                    let other_fp = Fingerprint::of(&job.tenant, &job.queue, id);
                    inner.processing_index.contains_key(&other_fp)
                });
                if clashes {
                    return Err(StoreError::QueueLocked);
                }
            }
        }

        let outcome = if inner.jobs.contains_key(&fp) { EnqueueOutcome::Replaced } else { EnqueueOutcome::Created };
        inner.unschedule(fp);
        inner.unpend(fp);
        inner.jobs.insert(fp, record);
        inner.queue_ids.entry((job.tenant.clone(), job.queue.clone())).or_default().insert(job.id.clone());

        if job.run_at <= now {
            inner.pending.push_back(fp);
            inner.pending_set.insert(fp);
            inner.emit_wake(&job.tenant, &job.queue);
        } else {
            let seq = inner.next_seq();
            inner.scheduled.insert((job.run_at, seq), fp);
            inner.scheduled_index.insert(fp, (job.run_at, seq));
        }

        inner.emit_activity(&job.tenant, ActivityEvent::Enqueued(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
        Ok(outcome)
    }

    async fn promote_due(&self, now: i64, limit: usize) -> Result<usize, StoreError> {
        let mut inner = self.inner.lock();
        let due: Vec<(ScoreKey, Fingerprint)> = inner
            .scheduled
            .range(..=(now, u64::MAX))
            .take(limit)
            .map(|(k, v)| (*k, *v))
            .collect();

        let mut woken = HashSet::new();
        for (key, fp) in &due {
            inner.scheduled.remove(key);
            inner.scheduled_index.remove(fp);
            inner.pending.push_back(*fp);
            inner.pending_set.insert(*fp);
            if let Some(record) = inner.jobs.get(fp) {
                if let Ok(job) = record.decode() {
                    woken.insert((job.tenant, job.queue));
                }
            }
        }
        for (tenant, queue) in woken {
            inner.emit_wake(&tenant, &queue);
        }
        Ok(due.len())
    }

    async fn claim(&self, tenant: &TenantId, now: i64, stale_after: i64) -> Result<Option<ClaimedJob>, StoreError> {
        let mut inner = self.inner.lock();

        let mut found = None;
        for (idx, fp) in inner.pending.iter().enumerate() {
            if let Some(record) = inner.jobs.get(fp) {
                if let Ok(job) = record.decode() {
                    if &job.tenant == tenant {
                        found = Some((idx, *fp, job));
                        break;
                    }
                }
            }
        }
        let Some((idx, fp, mut job)) = found else {
            return Ok(None);
        };

        inner.pending.remove(idx);
        inner.pending_set.remove(&fp);
        job.count += 1;
        let updated = JobRecord::encode(&job);
        inner.jobs.insert(fp, updated.clone());

        let seq = inner.next_seq();
        let deadline = now + stale_after;
        inner.processing.insert((deadline, seq), fp);
        inner.processing_index.insert(fp, (deadline, seq));

        inner.emit_activity(&job.tenant, ActivityEvent::Claimed(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
        Ok(Some(ClaimedJob { record: updated, fingerprint: fp, count: job.count }))
    }

    async fn acknowledge(
        &self,
        fingerprint: Fingerprint,
        expected_count: i64,
        decision: AckDecision,
    ) -> Result<AckOutcome, StoreError> {
        let mut inner = self.inner.lock();

        let Some(record) = inner.jobs.get(&fingerprint).cloned() else {
            return Err(StoreError::NotFound);
        };
        let mut job = record.decode()?;
        if job.count != expected_count {
            return Ok(AckOutcome::Stale);
        }

        inner.unprocess(fingerprint);
        match decision {
            AckDecision::Finalize => {
                inner.forget_job(fingerprint, &job.tenant, &job.queue, &job.id);
                inner.emit_activity(&job.tenant, ActivityEvent::Acknowledged(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
            }
            AckDecision::Reschedule { run_at, last_fire_time } => {
                job.run_at = run_at;
                if let Some(schedule) = &mut job.schedule {
                    schedule.last_fire_time = Some(last_fire_time);
                }
                inner.jobs.insert(fingerprint, JobRecord::encode(&job));
                let seq = inner.next_seq();
                inner.scheduled.insert((run_at, seq), fingerprint);
                inner.scheduled_index.insert(fingerprint, (run_at, seq));
                inner.emit_activity(&job.tenant, ActivityEvent::Rescheduled(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
            }
        }
        Ok(AckOutcome::Applied)
    }

    async fn report_stale(&self, now: i64) -> Result<Vec<StaleOutcome>, StoreError> {
        let mut inner = self.inner.lock();
        let due: Vec<(ScoreKey, Fingerprint)> = inner.processing.range(..=(now, u64::MAX)).map(|(k, v)| (*k, *v)).collect();

        let mut outcomes = Vec::with_capacity(due.len());
        for (key, fp) in due {
            inner.processing.remove(&key);
            inner.processing_index.remove(&fp);
            let Some(record) = inner.jobs.get(&fp).cloned() else { continue };
            let job = record.decode()?;

            if let Some(delay) = job.current_retry_delay_ms().filter(|_| job.has_retry_for_current_count()) {
                let next_retry_at = now + delay;
                let mut rescheduled = job.clone();
                rescheduled.run_at = next_retry_at;
                inner.jobs.insert(fp, JobRecord::encode(&rescheduled));
                let seq = inner.next_seq();
                inner.scheduled.insert((next_retry_at, seq), fp);
                inner.scheduled_index.insert(fp, (next_retry_at, seq));
                inner.emit_activity(&job.tenant, ActivityEvent::Rescheduled(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
                outcomes.push(StaleOutcome::Rescheduled {
                    fingerprint: fp,
                    tenant: job.tenant,
                    queue: job.queue,
                    id: job.id,
                    next_retry_at,
                });
            } else {
                inner.forget_job(fp, &job.tenant, &job.queue, &job.id);
                inner.emit_activity(&job.tenant, ActivityEvent::Failed(JobSummary { queue: job.queue.clone(), id: job.id.clone() }));
                outcomes.push(StaleOutcome::TimedOut { fingerprint: fp, tenant: job.tenant, queue: job.queue, id: job.id });
            }
        }
        Ok(outcomes)
    }

    async fn find_by_id(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<Option<JobRecord>, StoreError> {
        let fp = Fingerprint::of(tenant, queue, id);
        Ok(self.inner.lock().jobs.get(&fp).cloned())
    }

    async fn find_by_fingerprint(&self, fingerprint: Fingerprint) -> Result<Option<JobRecord>, StoreError> {
        Ok(self.inner.lock().jobs.get(&fingerprint).cloned())
    }

    async fn delete(&self, tenant: &TenantId, queue: &QueueName, id: &JobId) -> Result<bool, StoreError> {
        let fp = Fingerprint::of(tenant, queue, id);
        let mut inner = self.inner.lock();
        if inner.processing_index.contains_key(&fp) {
            return Ok(false);
        }
        if !inner.jobs.contains_key(&fp) {
            return Ok(false);
        }
        inner.unschedule(fp);
        inner.unpend(fp);
        inner.forget_job(fp, tenant, queue, id);
        Ok(true)
    }

    async fn invoke(&self, tenant: &TenantId, queue: &QueueName, id: &JobId, now: i64) -> Result<bool, StoreError> {
        let fp = Fingerprint::of(tenant, queue, id);
        let mut inner = self.inner.lock();
        if !inner.scheduled_index.contains_key(&fp) {
            return Ok(false);
        }
        inner.unschedule(fp);
        inner.pending.push_back(fp);
        inner.pending_set.insert(fp);
        inner.emit_wake(tenant, queue);
        let _ = now;
        Ok(true)
    }

    async fn subscribe_activity(&self, tenant: &TenantId) -> broadcast::Receiver<ActivityEvent> {
        let mut inner = self.inner.lock();
        inner
            .activity
            .entry(tenant.clone())
            .or_insert_with(|| broadcast::channel(ACTIVITY_CHANNEL_CAPACITY).0)
            .subscribe()
    }

    async fn subscribe_wake(&self, tenant: &TenantId, queue: &QueueName) -> broadcast::Receiver<()> {
        let mut inner = self.inner.lock();
        inner
            .wake
            .entry((tenant.clone(), queue.clone()))
            .or_insert_with(|| broadcast::channel(WAKE_CHANNEL_CAPACITY).0)
            .subscribe()
    }
}

#[cfg(any(test, feature = "test-support"))]
impl MemoryStore {
    /// Which of the three live sets a fingerprint currently occupies, if any.
    /// For tests that assert the mutual-exclusion invariant from outside the crate.
    pub fn debug_location(&self, fingerprint: Fingerprint) -> Option<&'static str> {
        let inner = self.inner.lock();
        let in_scheduled = inner.scheduled_index.contains_key(&fingerprint);
        let in_pending = inner.pending_set.contains(&fingerprint);
        let in_processing = inner.processing_index.contains_key(&fingerprint);
        match (in_scheduled, in_pending, in_processing) {
            (true, false, false) => Some("scheduled"),
            (false, true, false) => Some("pending"),
            (false, false, true) => Some("processing"),
            (false, false, false) => None,
            _ => Some("conflict"),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
