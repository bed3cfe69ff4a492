#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;

use rolegate_core::{Context, Result, RoleGateError, WorkloadPhase, WorkloadRecord};
use rolegate_engine::finder::{
    CoalescingWorkloadFinder, NamespaceFinder, StaticFinder, WorkloadBackend, WorkloadFinder,
};

mod stub;
use stub::{namespace, pod_with_role};

#[tokio::test]
async fn static_finder_tracks_upserts_and_removals() {
    let f = StaticFinder::new();
    let ctx = Context::background();
    f.upsert_workload(pod_with_role("red", "a", "10.0.0.1", "r1"));
    assert_eq!(f.find_by_source_address(&ctx, "10.0.0.1").await.unwrap().name, "a");

    // Moving a workload releases its old address.
    f.upsert_workload(pod_with_role("red", "a", "10.0.0.2", "r1"));
    assert_eq!(f.workload_count(), 1);
    assert_eq!(
        f.find_by_source_address(&ctx, "10.0.0.1").await,
        Err(RoleGateError::WorkloadNotFound)
    );
    assert!(f.find_by_source_address(&ctx, "10.0.0.2").await.is_ok());

    assert!(f.remove_workload("red", "a").is_some());
    assert_eq!(
        f.find_by_source_address(&ctx, "10.0.0.2").await,
        Err(RoleGateError::WorkloadNotFound)
    );
}

#[tokio::test]
async fn terminated_workloads_do_not_own_their_address() {
    let finished = WorkloadPhase::Succeeded;
    let done = WorkloadRecord::new("red", "old", "10.0.0.9", finished, Some("old_role"));
    let f = StaticFinder::from_records(vec![done], vec![]);
    let ctx = Context::background();
    assert_eq!(
        f.find_by_source_address(&ctx, "10.0.0.9").await,
        Err(RoleGateError::WorkloadNotFound)
    );

    f.upsert_workload(pod_with_role("red", "new", "10.0.0.9", "new_role"));
    let w = f.find_by_source_address(&ctx, "10.0.0.9").await.unwrap();
    assert_eq!(w.role.as_deref(), Some("new_role"));
}

#[tokio::test]
async fn static_finder_honors_cancelled_context() {
    let f = StaticFinder::from_records(
        vec![pod_with_role("red", "a", "10.0.0.1", "r1")],
        vec![namespace("red", "^r.*$")],
    );
    let ctx = Context::background();
    ctx.cancel();
    assert_eq!(f.find_by_source_address(&ctx, "10.0.0.1").await, Err(RoleGateError::Cancelled));
    assert_eq!(f.find_by_name(&ctx, "red").await, Err(RoleGateError::Cancelled));

    let live = Context::background();
    assert_eq!(f.find_by_name(&live, "red").await.unwrap().name, "red");
    assert!(f.remove_namespace("red").is_some());
    assert_eq!(
        f.find_by_name(&live, "red").await,
        Err(RoleGateError::NamespaceNotFound("red".into()))
    );
}

/// Backend that sleeps and counts its lookups.
struct SlowBackend {
    delay: Duration,
    lookups: AtomicUsize,
}

impl SlowBackend {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            lookups: AtomicUsize::new(0),
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl WorkloadBackend for SlowBackend {
    fn lookup(&self, address: &str) -> Result<WorkloadRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        if address == "10.0.0.1" {
            Ok(pod_with_role("red", "a", address, "red_role"))
        } else {
            Err(RoleGateError::WorkloadNotFound)
        }
    }
}

#[tokio::test]
async fn concurrent_callers_share_one_lookup() {
    let f = CoalescingWorkloadFinder::new(SlowBackend::new(Duration::from_millis(100)));
    let ctx = Context::background();

    let results = join_all((0..8).map(|_| f.find_by_source_address(&ctx, "10.0.0.1"))).await;
    assert!(results.iter().all(|r| r.as_ref().map(|w| w.name.as_str()) == Ok("a")));
    assert_eq!(f.backend().lookups(), 1);
    assert_eq!(f.inflight_len(), 0);

    // A later request looks up again.
    f.find_by_source_address(&ctx, "10.0.0.1").await.unwrap();
    assert_eq!(f.backend().lookups(), 2);
}

#[tokio::test]
async fn coalesced_not_found_is_propagated() {
    let f = CoalescingWorkloadFinder::new(SlowBackend::new(Duration::from_millis(1)));
    assert_eq!(
        f.find_by_source_address(&Context::background(), "10.9.9.9").await,
        Err(RoleGateError::WorkloadNotFound)
    );
}

#[tokio::test]
async fn cancelled_caller_does_not_disturb_shared_lookup() {
    let f = Arc::new(CoalescingWorkloadFinder::new(SlowBackend::new(Duration::from_millis(200))));
    let impatient = Context::background();
    let patient = Context::background();

    let a = tokio::spawn({
        let f = Arc::clone(&f);
        let ctx = impatient.clone();
        async move { f.find_by_source_address(&ctx, "10.0.0.1").await }
    });
    let b = tokio::spawn({
        let f = Arc::clone(&f);
        let ctx = patient.clone();
        async move { f.find_by_source_address(&ctx, "10.0.0.1").await }
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    impatient.cancel();
    let started = std::time::Instant::now();
    assert_eq!(a.await.unwrap(), Err(RoleGateError::Cancelled));
    assert!(started.elapsed() < Duration::from_millis(150), "cancel must not wait for the lookup");

    assert_eq!(b.await.unwrap().unwrap().role.as_deref(), Some("red_role"));
    assert_eq!(f.backend().lookups(), 1);
}

#[tokio::test]
async fn abandoned_lookups_are_reaped() {
    let f = CoalescingWorkloadFinder::new(SlowBackend::new(Duration::from_millis(30)));

    for i in 0..20 {
        let ctx = Context::background().with_timeout(Duration::from_millis(1));
        let address = format!("10.1.0.{i}");
        assert_eq!(
            f.find_by_source_address(&ctx, &address).await,
            Err(RoleGateError::DeadlineExceeded)
        );
    }

    // Nobody waits any more; the entries must still go once the backend answers.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(f.inflight_len(), 0);
    assert_eq!(f.backend().lookups(), 20);
}
