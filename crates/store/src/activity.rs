// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle events re-emitted on the `jobq:{tenant}:activity` pub/sub
//! channel (SPEC_FULL.md §4.5). Best-effort, observation-only.

use jobq_core::{JobId, QueueName};

/// A job summary attached to every activity event — cheap enough to clone
/// into a broadcast channel without re-decoding the full record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub queue: QueueName,
    pub id: JobId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    Enqueued(JobSummary),
    Claimed(JobSummary),
    Acknowledged(JobSummary),
    Rescheduled(JobSummary),
    Failed(JobSummary),
}
