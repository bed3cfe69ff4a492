//! Workload finder that shares one in-flight lookup per address.
//!
//! Concurrent requests from the same address (a workload fetching credentials
//! from several threads at start-up) would otherwise each hit the backend. The
//! first caller starts a lookup in a [`ResultCell`]; callers arriving while it
//! is pending wait on the same cell, each with its own context. Once a result
//! has been observed the entry is dropped, so later requests always look up
//! fresh state. A lookup every caller gave up on is dropped by its own
//! reaper task as soon as the backend answers.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use rolegate_core::{Context, Result, ResultCell, WorkloadRecord};

use super::WorkloadFinder;

/// Blocking lookup against the identity store.
pub trait WorkloadBackend: Send + Sync + 'static {
    fn lookup(&self, address: &str) -> Result<WorkloadRecord>;
}

pub struct CoalescingWorkloadFinder<B> {
    backend: Arc<B>,
    inflight: Arc<DashMap<String, ResultCell<WorkloadRecord>>>,
}

impl<B: WorkloadBackend> CoalescingWorkloadFinder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Arc::new(backend),
            inflight: Arc::new(DashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Number of addresses with a lookup not yet observed by any caller.
    pub fn inflight_len(&self) -> usize {
        self.inflight.len()
    }

    fn start(&self, address: &str) -> ResultCell<WorkloadRecord> {
        let backend = Arc::clone(&self.backend);
        let key = address.to_string();
        let cell = ResultCell::spawn_blocking(move || backend.lookup(&key));

        // Reaper: waiters may all have left, so the entry cannot rely on them.
        let inflight = Arc::clone(&self.inflight);
        let key = address.to_string();
        let done = cell.clone();
        tokio::spawn(async move {
            let _ = done.get(&Context::background()).await;
            inflight.remove_if(&key, |_, c| c.is_complete());
        });
        cell
    }

    fn cell_for(&self, address: &str) -> ResultCell<WorkloadRecord> {
        match self.inflight.entry(address.to_string()) {
            Entry::Occupied(mut e) => {
                // Completed but unobserved (every earlier waiter gave up): do
                // not serve a stale answer.
                if e.get().is_complete() {
                    e.insert(self.start(address));
                } else {
                    tracing::trace!(%address, "joining in-flight workload lookup");
                }
                e.get().clone()
            }
            Entry::Vacant(e) => e.insert(self.start(address)).value().clone(),
        }
    }
}

#[async_trait]
impl<B: WorkloadBackend> WorkloadFinder for CoalescingWorkloadFinder<B> {
    async fn find_by_source_address(
        &self,
        ctx: &Context,
        address: &str,
    ) -> Result<WorkloadRecord> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }

        let cell = self.cell_for(address);
        let result = cell.get(ctx).await;
        if !matches!(&result, Err(e) if e.is_cancellation()) {
            self.inflight.remove_if(address, |_, c| c.is_complete());
        }
        result
    }
}
