//! Scenario 5 from SPEC_FULL.md §8: `maxJobs` caps in-flight dispatch.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

use crate::prelude::*;

#[tokio::test]
async fn max_jobs_three_admits_three_then_waits_for_a_free_slot() {
    let clock = FakeClock::new();
    let store: Arc<dyn BackingStore> = Arc::new(MemoryStore::new());
    let repository = Arc::new(JobRepository::with_default_schedules(Arc::clone(&store)));

    let tenants = ["t1", "t2", "t3", "t4"];
    for tenant in tenants {
        repository.enqueue(&immediate_job(tenant, "q", &format!("j-{tenant}")), clock.epoch_ms()).await.unwrap();
    }

    let fetch_calls = Arc::new(AtomicUsize::new(0));
    let fetcher = Arc::new(CountingFetcher {
        inner: RepositoryFetcher::new(Arc::clone(&repository), clock.clone(), 30_000),
        calls: Arc::clone(&fetch_calls),
    });

    let gates: HashMap<JobId, Arc<Notify>> =
        tenants.iter().map(|t| (JobId::from(format!("j-{t}")), Arc::new(Notify::new()))).collect();
    let gates = Arc::new(gates);

    let work: WorkFn = {
        let gates = Arc::clone(&gates);
        Arc::new(move |job: Job, _tenant, _token| {
            let gates = Arc::clone(&gates);
            Box::pin(async move {
                gates[&job.id].notified().await;
                Ok(())
            }) as BoxFuture<'static, Result<(), String>>
        })
    };

    let tenant_source = Box::new(StaticTenantSource::new(tenants.iter().map(|t| TenantId::from(*t))));
    let distributor = Arc::new(JobDistributor::new(
        fetcher,
        work,
        tenant_source,
        3,
        Arc::new(ManualTimer::new()),
        Arc::new(NoWake),
        Arc::new(BufferErrorSink::new()),
        60_000,
    ));

    let handle = {
        let distributor = Arc::clone(&distributor);
        tokio::spawn(async move { distributor.run().await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 3, "only 3 fetches admitted while all 3 slots are held");

    gates[&JobId::from("j-t1")].notify_waiters();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fetch_calls.load(Ordering::SeqCst), 4, "freeing one slot admits exactly the 4th fetch");

    for tenant in tenants {
        gates[&JobId::from(format!("j-{tenant}"))].notify_waiters();
    }
    distributor.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.abort();
}

struct CountingFetcher {
    inner: RepositoryFetcher<FakeClock>,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, tenant: &TenantId) -> Result<FetchOutcome<Dispatch>, jobq_engine::DistributorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(tenant).await
    }
}
