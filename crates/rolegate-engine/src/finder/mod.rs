//! Identity lookup capabilities consumed by the policies.
//!
//! Implementations are usually backed by a continuously updated cache of the
//! orchestrator's state. Policies treat every call as an independent read of
//! current state; two lookups in one evaluation may observe different
//! snapshots.

pub mod coalescing;
pub mod memory;

use async_trait::async_trait;

use rolegate_core::{Context, NamespaceRecord, Result, WorkloadRecord};

pub use coalescing::{CoalescingWorkloadFinder, WorkloadBackend};
pub use memory::StaticFinder;

/// Source address -> workload.
#[async_trait]
pub trait WorkloadFinder: Send + Sync {
    /// Fails with `RoleGateError::WorkloadNotFound` when no live workload
    /// owns `address`. Must return the context's error once `ctx` ends.
    async fn find_by_source_address(&self, ctx: &Context, address: &str) -> Result<WorkloadRecord>;
}

/// Namespace name -> namespace.
#[async_trait]
pub trait NamespaceFinder: Send + Sync {
    /// Backend failures surface as `RoleGateError::NamespaceLookupFailed`.
    async fn find_by_name(&self, ctx: &Context, name: &str) -> Result<NamespaceRecord>;
}
