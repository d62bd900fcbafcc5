// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Job, JobId, QueueName, Schedule, TenantId};

/// Proptest strategies for the core data model.
pub mod strategies {
    use super::*;
    use proptest::prelude::*;

    pub fn arb_tenant() -> impl Strategy<Value = TenantId> {
        prop_oneof![Just(TenantId::from("")), "[a-z]{1,8}".prop_map(TenantId::from)]
    }

    pub fn arb_queue() -> impl Strategy<Value = QueueName> {
        "[a-z][a-z0-9_-]{0,12}".prop_map(QueueName::from)
    }

    pub fn arb_job_id() -> impl Strategy<Value = JobId> {
        "[a-z][a-z0-9_-]{0,16}".prop_map(JobId::from)
    }

    pub fn arb_retry() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(1i64..10_000, 0..4)
    }

    /// A job with no schedule, ready to claim immediately (`run_at == 0`).
    pub fn arb_immediate_job() -> impl Strategy<Value = Job> {
        (arb_tenant(), arb_queue(), arb_job_id(), arb_retry(), any::<bool>()).prop_map(
            |(tenant, queue, id, retry, exclusive)| {
                Job::builder()
                    .tenant(tenant)
                    .queue(queue)
                    .id(id)
                    .retry(retry)
                    .exclusive(exclusive)
                    .build()
            },
        )
    }

    pub fn arb_schedule() -> impl Strategy<Value = Schedule> {
        (1i64..3600, any::<Option<i64>>())
            .prop_map(|(secs, last)| Schedule { kind: "every".to_string(), meta: secs.to_string(), last_fire_time: last })
    }
}

/// Build a non-repeating job that is immediately due, for tests that don't
/// care about scheduling.
pub fn immediate_job(tenant: &str, queue: &str, id: &str) -> Job {
    Job::builder().tenant(tenant).queue(queue).id(id).build()
}

/// Build a job with a retry policy, immediately due.
pub fn job_with_retry(tenant: &str, queue: &str, id: &str, retry: Vec<i64>) -> Job {
    Job::builder().tenant(tenant).queue(queue).id(id).retry(retry).build()
}

/// Build a repeating job on the `"every"` schedule, immediately due.
pub fn repeating_job(tenant: &str, queue: &str, id: &str, every_ms: i64) -> Job {
    Job::builder()
        .tenant(tenant)
        .queue(queue)
        .id(id)
        .schedule(Schedule::new("every", every_ms.to_string()))
        .build()
}
