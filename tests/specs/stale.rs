//! Scenarios 1 and 3 from SPEC_FULL.md §8.

use crate::prelude::*;

fn repo() -> Arc<JobRepository> {
    Arc::new(JobRepository::with_default_schedules(Arc::new(MemoryStore::new())))
}

/// Scenario 1: a stalling job (processor never acks) is reported as timed
/// out only once its claim deadline has passed.
#[tokio::test]
async fn stalling_job_emits_timeout() {
    let clock = FakeClock::at(0);
    let repository = repo();
    let tenant = TenantId::default();
    let job = immediate_job("", "stally-stall", "stalling-job");

    repository.enqueue(&job, 0).await.unwrap();
    repository.claim(&tenant, 0, 1000).await.unwrap().expect("job is claimable");

    let sink = Arc::new(BufferErrorSink::new());
    let checker = StaleChecker::new(
        Arc::clone(&repository),
        clock.clone(),
        StaleCheckerConfig { stale_after_ms: 1000, interval: StaleCheckInterval::Manual },
        sink.clone(),
        Arc::new(ManualTimer::new()),
    );

    checker.check().await.unwrap();
    assert!(sink.is_empty(), "claim deadline has not passed at t=0");

    clock.set_epoch_ms(1500);
    checker.check().await.unwrap();

    let errors = sink.drain();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        jobq_engine::EngineError::JobTimedOut { tenant, job_id, queue_id, timestamp_for_next_retry } => {
            assert_eq!(tenant, &TenantId::default());
            assert_eq!(job_id.as_str(), "stalling-job");
            assert_eq!(queue_id.as_str(), "stally-stall");
            assert!(timestamp_for_next_retry.is_none());
        }
        other => panic!("expected JobTimedOut, got {other:?}"),
    }
}

/// Scenario 3: a job whose processor acknowledges it well before the stale
/// deadline never appears in a `check()` pass.
#[tokio::test]
async fn healthy_job_never_times_out() {
    let clock = FakeClock::at(0);
    let repository = repo();
    let tenant = TenantId::default();
    let job = immediate_job("", "q", "healthy-job");

    repository.enqueue(&job, 0).await.unwrap();
    let (_, token) = repository.claim(&tenant, 0, 1000).await.unwrap().unwrap();

    let sink = Arc::new(BufferErrorSink::new());
    let checker = StaleChecker::new(
        Arc::clone(&repository),
        clock.clone(),
        StaleCheckerConfig { stale_after_ms: 1000, interval: StaleCheckInterval::Manual },
        sink.clone(),
        Arc::new(ManualTimer::new()),
    );

    clock.set_epoch_ms(500);
    checker.check().await.unwrap();
    repository.acknowledge(token, false, 500).await.unwrap();

    clock.set_epoch_ms(1500);
    checker.check().await.unwrap();

    assert!(sink.is_empty());
}
