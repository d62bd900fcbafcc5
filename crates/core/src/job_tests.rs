// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn builder_defaults_produce_a_fresh_non_repeating_job() {
    let job = Job::builder().build();
    assert_eq!(job.tenant.as_str(), "");
    assert_eq!(job.count, 0);
    assert!(job.schedule.is_none());
    assert!(job.retry.is_empty());
}

#[test]
fn fingerprint_is_stable_for_same_identity() {
    let a = Job::builder().tenant("t").queue("q").id("id").build();
    let b = Job::builder().tenant("t").queue("q").id("id").build();
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[yare::parameterized(
    no_claims_yet      = { 0, vec![100],      false },
    first_claim_retry0 = { 1, vec![],          false },
    first_claim_retry1 = { 1, vec![100],       true },
    second_claim       = { 2, vec![100, 200],  true },
    exceeds_retry_len  = { 3, vec![100, 200],  false },
)]
fn has_retry_for_current_count(count: i64, retry: Vec<i64>, expected: bool) {
    let job = Job::builder().count(count).retry(retry).build();
    assert_eq!(job.has_retry_for_current_count(), expected);
}

#[test]
fn current_retry_delay_indexes_by_count_minus_one() {
    let job = Job::builder().count(2).retry(vec![100, 250, 500]).build();
    assert_eq!(job.current_retry_delay_ms(), Some(250));
}

#[test]
fn current_retry_delay_is_none_before_first_claim() {
    let job = Job::builder().count(0).retry(vec![100]).build();
    assert_eq!(job.current_retry_delay_ms(), None);
}

#[test]
fn schedule_exhausted_respects_max_times() {
    let job = Job::builder().count(3).max_times(3).build();
    assert!(job.schedule_exhausted());
    let job = Job::builder().count(2).max_times(3).build();
    assert!(!job.schedule_exhausted());
}

#[test]
fn schedule_never_exhausted_without_max_times() {
    let job = Job::builder().count(1_000_000).build();
    assert!(!job.schedule_exhausted());
}

#[test]
fn job_serde_roundtrip_preserves_schedule() {
    let job = Job::builder()
        .schedule(Schedule::new("every", "1000"))
        .retry(vec![100, 200])
        .build();
    let json = serde_json::to_string(&job).unwrap();
    let restored: Job = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, job);
}
