//! Stub finders and policies shared by the engine tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use rolegate_core::{
    Context, Decision, NamespaceRecord, Result, RoleGateError, WorkloadPhase, WorkloadRecord,
};
use rolegate_engine::finder::{NamespaceFinder, StaticFinder, WorkloadFinder};
use rolegate_engine::Policy;

pub fn pod_with_role(namespace: &str, name: &str, address: &str, role: &str) -> WorkloadRecord {
    WorkloadRecord::new(namespace, name, address, WorkloadPhase::Running, Some(role))
}

pub fn namespace(name: &str, pattern: &str) -> NamespaceRecord {
    NamespaceRecord::new(name, Some(pattern))
}

pub fn finder(
    workloads: Vec<WorkloadRecord>,
    namespaces: Vec<NamespaceRecord>,
) -> Arc<StaticFinder> {
    Arc::new(StaticFinder::from_records(workloads, namespaces))
}

/// Policy with a fixed verdict that counts its evaluations.
pub struct CountingPolicy {
    name: &'static str,
    allow: bool,
    calls: AtomicUsize,
}

impl CountingPolicy {
    pub fn new(name: &'static str, allow: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            allow,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Policy for CountingPolicy {
    fn name(&self) -> &str {
        self.name
    }

    async fn is_allowed_assume_role(
        &self,
        _ctx: &Context,
        role: &str,
        _address: &str,
    ) -> Result<Decision> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Decision::new(self.allow, format!("{} says {} for {role}", self.name, self.allow)))
    }
}

/// Policy that always fails to evaluate.
pub struct FailingPolicy;

#[async_trait]
impl Policy for FailingPolicy {
    fn name(&self) -> &str {
        "failing"
    }

    async fn is_allowed_assume_role(
        &self,
        _ctx: &Context,
        _role: &str,
        _address: &str,
    ) -> Result<Decision> {
        Err(RoleGateError::WorkloadLookupFailed("backend down".into()))
    }
}

/// Workload finder whose lookup never finishes on its own.
pub struct HangingFinder;

#[async_trait]
impl WorkloadFinder for HangingFinder {
    async fn find_by_source_address(
        &self,
        ctx: &Context,
        _address: &str,
    ) -> Result<WorkloadRecord> {
        ctx.run(std::future::pending()).await
    }
}

/// Namespace finder whose backend is unavailable.
pub struct BrokenNamespaceFinder;

#[async_trait]
impl NamespaceFinder for BrokenNamespaceFinder {
    async fn find_by_name(&self, _ctx: &Context, name: &str) -> Result<NamespaceRecord> {
        Err(RoleGateError::NamespaceLookupFailed(format!("cannot list {name}")))
    }
}
