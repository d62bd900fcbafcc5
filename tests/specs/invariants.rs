//! Property-based coverage of the storage invariants from SPEC_FULL.md §8.

use proptest::prelude::*;

use crate::prelude::*;

#[tokio::test]
async fn live_fingerprint_occupies_exactly_one_set() {
    let clock = FakeClock::new();
    let store = Arc::new(MemoryStore::new());
    let backing: Arc<dyn BackingStore> = Arc::clone(&store);
    let repository = Arc::new(JobRepository::with_default_schedules(backing));
    let tenant = TenantId::default();

    let job = immediate_job("", "q", "job-1");
    let fingerprint = job.fingerprint();
    repository.enqueue(&job, clock.epoch_ms()).await.unwrap();
    assert_eq!(store.debug_location(fingerprint), Some("pending"));

    let (_, token) = repository.claim(&tenant, clock.epoch_ms(), 5_000).await.unwrap().unwrap();
    assert_eq!(store.debug_location(fingerprint), Some("processing"));

    let scheduled = job_with_retry("", "q", "job-2", vec![1_000]);
    let scheduled_fp = scheduled.fingerprint();
    let mut scheduled = scheduled;
    scheduled.run_at = clock.epoch_ms() + 60_000;
    repository.enqueue(&scheduled, clock.epoch_ms()).await.unwrap();
    assert_eq!(store.debug_location(scheduled_fp), Some("scheduled"));

    repository.acknowledge(token, false, clock.epoch_ms()).await.unwrap();
    assert_eq!(store.debug_location(fingerprint), None, "finalized job leaves every set");
}

#[tokio::test]
async fn acknowledge_finalize_removes_job_and_queue_index() {
    let clock = FakeClock::new();
    let store = Arc::new(MemoryStore::new());
    let backing: Arc<dyn BackingStore> = Arc::clone(&store);
    let repository = Arc::new(JobRepository::with_default_schedules(backing));
    let tenant = TenantId::default();
    let queue = QueueName::from("q");
    let id = JobId::from("one-shot");

    repository.enqueue(&immediate_job("", "q", "one-shot"), clock.epoch_ms()).await.unwrap();
    let (job, token) = repository.claim(&tenant, clock.epoch_ms(), 5_000).await.unwrap().unwrap();
    repository.acknowledge(token, false, clock.epoch_ms()).await.unwrap();

    assert!(repository.find_by_id(&tenant, &queue, &id).await.unwrap().is_none());
    assert_eq!(store.debug_location(job.fingerprint()), None);
}

#[tokio::test]
async fn claim_sets_processing_score_to_claim_time_plus_stale_after() {
    let clock = FakeClock::at(500);
    let store = Arc::new(MemoryStore::new());
    let backing: Arc<dyn BackingStore> = Arc::clone(&store);
    let repository = Arc::new(JobRepository::with_default_schedules(backing));
    let tenant = TenantId::default();

    repository.enqueue(&immediate_job("", "q", "deadline-job"), clock.epoch_ms()).await.unwrap();
    let stale_after = 7_500;
    let (job, _token) = repository.claim(&tenant, clock.epoch_ms(), stale_after).await.unwrap().unwrap();
    let fingerprint = job.fingerprint();

    assert_eq!(store.debug_location(fingerprint), Some("processing"));

    // A report_stale pass just before the deadline reclaims nothing; just at
    // or after it, it reclaims exactly this job. That brackets the stored
    // score at claim_time + stale_after.
    let before = repository.report_stale(clock.epoch_ms() + stale_after - 1).await.unwrap();
    assert!(before.is_empty());
    assert_eq!(store.debug_location(fingerprint), Some("processing"));

    let at_deadline = repository.report_stale(clock.epoch_ms() + stale_after).await.unwrap();
    assert_eq!(at_deadline.len(), 1);
}

#[tokio::test]
async fn reclaimed_retry_reappears_with_run_at_from_the_indexed_delay() {
    let clock = FakeClock::at(0);
    let store = Arc::new(MemoryStore::new());
    let backing: Arc<dyn BackingStore> = Arc::clone(&store);
    let repository = Arc::new(JobRepository::with_default_schedules(backing));
    let tenant = TenantId::default();
    let queue = QueueName::from("q");
    let id = JobId::from("retry-job");

    repository.enqueue(&job_with_retry("", "q", "retry-job", vec![100, 900]), clock.epoch_ms()).await.unwrap();
    let (job, _token) = repository.claim(&tenant, clock.epoch_ms(), 5_000).await.unwrap().unwrap();
    assert_eq!(job.count, 1);

    let reclaim_at = 200;
    let outcomes = repository.report_stale(reclaim_at).await.unwrap();
    assert_eq!(outcomes.len(), 1);

    let reappeared = repository.find_by_id(&tenant, &queue, &id).await.unwrap().unwrap();
    assert_eq!(reappeared.run_at, reclaim_at + 100, "retry[count - 1] with count == 1 is retry[0]");
    assert_eq!(store.debug_location(job.fingerprint()), Some("scheduled"));
}

#[tokio::test]
async fn acknowledge_is_idempotent_for_a_repeated_token() {
    let clock = FakeClock::new();
    let backing: Arc<dyn BackingStore> = Arc::new(MemoryStore::new());
    let repository = Arc::new(JobRepository::with_default_schedules(backing));
    let tenant = TenantId::default();

    repository.enqueue(&immediate_job("", "q", "once"), clock.epoch_ms()).await.unwrap();
    let (_, token) = repository.claim(&tenant, clock.epoch_ms(), 5_000).await.unwrap().unwrap();

    let first = repository.acknowledge(token, false, clock.epoch_ms()).await.unwrap();
    assert_eq!(first.outcome, AckOutcome::Applied);

    let second = repository.acknowledge(token, false, clock.epoch_ms()).await.unwrap();
    assert_eq!(second.outcome, AckOutcome::Stale, "a second acknowledge of the same token is a no-op, not an error");
}

proptest! {
    #[test]
    fn enqueue_claim_ack_cycle_never_leaves_a_fingerprint_in_two_sets(
        retry_count in 0usize..4,
        stale_after in 1_000i64..10_000,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let clock = FakeClock::new();
            let store = Arc::new(MemoryStore::new());
            let backing: Arc<dyn BackingStore> = Arc::clone(&store);
            let repository = Arc::new(JobRepository::with_default_schedules(backing));
            let tenant = TenantId::default();

            let retry: Vec<i64> = (0..retry_count).map(|i| 100 * (i as i64 + 1)).collect();
            let job = job_with_retry("", "q", "cycled", retry);
            let fingerprint = job.fingerprint();
            repository.enqueue(&job, clock.epoch_ms()).await.unwrap();
            prop_assert_eq!(store.debug_location(fingerprint), Some("pending"));

            let (_, token) = repository.claim(&tenant, clock.epoch_ms(), stale_after).await.unwrap().unwrap();
            prop_assert_eq!(store.debug_location(fingerprint), Some("processing"));

            repository.acknowledge(token, true, clock.epoch_ms()).await.unwrap();
            prop_assert_eq!(store.debug_location(fingerprint), None);
        });
        Ok(())
    }
}
