// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job record and its ack token.

use serde::{Deserialize, Serialize};

use crate::fingerprint::Fingerprint;
use crate::ids::{JobId, QueueName, TenantId};

/// A job's schedule: which `ScheduleMap` entry computes its next `runAt`,
/// the opaque config for that entry, and the epoch ms of its last fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Indexes into the `ScheduleMap` registry (e.g. `"every"`, `"cron"`).
    pub kind: String,
    /// Opaque configuration string interpreted by the named schedule function.
    pub meta: String,
    /// Epoch ms this schedule last fired, if it has fired at least once.
    pub last_fire_time: Option<i64>,
}

impl Schedule {
    pub fn new(kind: impl Into<String>, meta: impl Into<String>) -> Self {
        Self { kind: kind.into(), meta: meta.into(), last_fire_time: None }
    }
}

/// A unit of work: identity, payload, timing, and retry/repeat policy.
///
/// `count` starts at 0 and is incremented on every `claim` — including
/// claims that originate from a stale reclaim or a schedule re-fire — so it
/// is the generation number the ack-token mechanism and the retry-index
/// math both depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub tenant: TenantId,
    pub queue: QueueName,
    pub id: JobId,
    pub payload: Vec<u8>,
    /// Epoch ms at which the job becomes eligible for `pending`.
    pub run_at: i64,
    pub schedule: Option<Schedule>,
    /// Ordered backoff delays in ms. `retry[count - 1]` is used when a claim
    /// with this `count` goes stale.
    pub retry: Vec<i64>,
    /// How many times this job has been claimed (initial claim and every
    /// subsequent retry/re-fire). Monotonically non-decreasing for the life
    /// of `(tenant, queue, id)`.
    pub count: i64,
    /// Caps the number of times a repeating job may re-fire.
    pub max_times: Option<i64>,
    /// Serializes claims across the whole queue: while any job of this
    /// queue is in `processing`, no other job of the queue may be claimed.
    pub exclusive: bool,
}

impl Job {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.tenant, &self.queue, &self.id)
    }

    /// True if this job still has a retry slot left for its current `count`.
    pub fn has_retry_for_current_count(&self) -> bool {
        self.count >= 1 && (self.count as usize) <= self.retry.len()
    }

    /// The backoff delay to use for the current `count`, if any.
    pub fn current_retry_delay_ms(&self) -> Option<i64> {
        if self.count < 1 {
            return None;
        }
        self.retry.get(self.count as usize - 1).copied()
    }

    /// True if a repeating job has exhausted its `max_times` budget.
    pub fn schedule_exhausted(&self) -> bool {
        match self.max_times {
            Some(max) => self.count >= max,
            None => false,
        }
    }
}

crate::builder! {
    pub struct JobBuilder => Job {
        into {
            tenant: TenantId = "",
            queue: QueueName = "test-queue",
            id: JobId = "test-job",
        }
        set {
            payload: Vec<u8> = Vec::new(),
            run_at: i64 = 0,
            retry: Vec<i64> = Vec::new(),
            count: i64 = 0,
            exclusive: bool = false,
        }
        option {
            schedule: Schedule = None,
            max_times: i64 = None,
        }
    }
}

/// Opaque proof that the holder is the current claimer of a job: a
/// `(fingerprint, count)` pair. `acknowledge` rejects any token whose
/// `count` no longer matches the live job record (`StaleAck`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckToken {
    pub fingerprint: Fingerprint,
    pub count: i64,
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
