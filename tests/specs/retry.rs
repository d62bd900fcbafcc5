//! Scenario 2 from SPEC_FULL.md §8: a stale reclaim with a retry slot left
//! reschedules quietly and the job is claimable again shortly after.

use crate::prelude::*;

#[tokio::test]
async fn retry_reschedules_quietly_and_is_reclaimed_again() {
    let clock = FakeClock::at(0);
    let repository = Arc::new(JobRepository::with_default_schedules(Arc::new(MemoryStore::new())));
    let tenant = TenantId::default();
    let job = job_with_retry("", "q", "retrying-job", vec![100]);

    repository.enqueue(&job, 0).await.unwrap();
    let (claimed, _) = repository.claim(&tenant, 0, 1000).await.unwrap().unwrap();
    assert_eq!(claimed.count, 1);

    let sink = Arc::new(BufferErrorSink::new());
    let checker = StaleChecker::new(
        Arc::clone(&repository),
        clock.clone(),
        StaleCheckerConfig { stale_after_ms: 1000, interval: StaleCheckInterval::Manual },
        sink.clone(),
        Arc::new(ManualTimer::new()),
    );

    clock.set_epoch_ms(1100);
    let reclaimed = checker.check().await.unwrap();
    assert_eq!(reclaimed, 1);
    assert!(sink.is_empty(), "a reclaim with a retry slot left must be silent");

    // Reclaim time (1100) + retry[0] (100) = 1200: the job is due again well
    // within the 800ms window the scenario allows.
    let reclaim_time = 1100;
    let expected_run_at = reclaim_time + 100;
    assert!(expected_run_at - reclaim_time <= 800);

    repository.promote_due(expected_run_at, 10).await.unwrap();
    let (reclaimed_job, _) = repository.claim(&tenant, expected_run_at, 1000).await.unwrap().expect("claimable again");
    assert_eq!(reclaimed_job.count, 2);
}
