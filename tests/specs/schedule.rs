//! Scenario 4 from SPEC_FULL.md §8: `dontReschedule` overrides a repeating
//! job's schedule and terminates it on the next acknowledge.

use crate::prelude::*;

#[tokio::test]
async fn dont_reschedule_terminates_a_repeating_job() {
    let clock = FakeClock::new();
    let repository = Arc::new(JobRepository::with_default_schedules(Arc::new(MemoryStore::new())));
    let tenant = TenantId::default();
    let queue = QueueName::from("q");
    let id = JobId::from("ticking-job");
    let job = repeating_job("", "q", "ticking-job", 1000);

    repository.enqueue(&job, clock.epoch_ms()).await.unwrap();
    let (_, token) = repository.claim(&tenant, clock.epoch_ms(), 5000).await.unwrap().unwrap();

    let acknowledger = Acknowledger::new(Arc::clone(&repository), clock);
    let outcome = acknowledger.acknowledge(token, AckOptions { dont_reschedule: true }).await.unwrap();
    assert_eq!(outcome, AckOutcome::Applied);

    assert!(repository.find_by_id(&tenant, &queue, &id).await.unwrap().is_none());
}

#[tokio::test]
async fn without_dont_reschedule_a_repeating_job_survives_acknowledge() {
    let clock = FakeClock::new();
    let repository = Arc::new(JobRepository::with_default_schedules(Arc::new(MemoryStore::new())));
    let tenant = TenantId::default();
    let queue = QueueName::from("q");
    let id = JobId::from("ticking-job");
    let job = repeating_job("", "q", "ticking-job", 1000);

    repository.enqueue(&job, clock.epoch_ms()).await.unwrap();
    let (_, token) = repository.claim(&tenant, clock.epoch_ms(), 5000).await.unwrap().unwrap();

    let acknowledger = Acknowledger::new(Arc::clone(&repository), clock);
    acknowledger.acknowledge(token, AckOptions::default()).await.unwrap();

    assert!(repository.find_by_id(&tenant, &queue, &id).await.unwrap().is_some());
}
