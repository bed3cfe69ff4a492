//! In-memory finder backed by `DashMap`.
//!
//! Serves config fixtures and tests, and is the shape a watch-fed cache takes:
//! writers upsert/remove records, readers look them up concurrently.

use async_trait::async_trait;
use dashmap::DashMap;

use rolegate_core::{Context, NamespaceRecord, Result, RoleGateError, WorkloadRecord};

use super::{NamespaceFinder, WorkloadFinder};

/// Workloads indexed by address, namespaces by name.
#[derive(Default)]
pub struct StaticFinder {
    // address -> records sharing it (a finished workload may linger next to its successor)
    by_address: DashMap<String, Vec<WorkloadRecord>>,
    // namespace/name -> address
    addresses: DashMap<String, String>,
    namespaces: DashMap<String, NamespaceRecord>,
}

impl StaticFinder {
    pub fn new() -> Self {
        Self {
            by_address: DashMap::new(),
            addresses: DashMap::new(),
            namespaces: DashMap::new(),
        }
    }

    pub fn from_records(
        workloads: impl IntoIterator<Item = WorkloadRecord>,
        namespaces: impl IntoIterator<Item = NamespaceRecord>,
    ) -> Self {
        let finder = Self::new();
        for w in workloads {
            finder.upsert_workload(w);
        }
        for n in namespaces {
            finder.upsert_namespace(n);
        }
        finder
    }

    /// Insert or replace a workload, keyed by `namespace/name`.
    pub fn upsert_workload(&self, workload: WorkloadRecord) {
        let key = workload.key();
        self.remove_workload(&workload.namespace, &workload.name);
        self.addresses.insert(key, workload.address.clone());
        self.by_address
            .entry(workload.address.clone())
            .or_default()
            .push(workload);
    }

    pub fn remove_workload(&self, namespace: &str, name: &str) -> Option<WorkloadRecord> {
        let key = format!("{namespace}/{name}");
        let (_, address) = self.addresses.remove(&key)?;

        let mut removed = None;
        if let Some(mut records) = self.by_address.get_mut(&address) {
            if let Some(pos) = records.iter().position(|w| w.key() == key) {
                removed = Some(records.remove(pos));
            }
        }
        self.by_address.remove_if(&address, |_, records| records.is_empty());
        removed
    }

    pub fn upsert_namespace(&self, namespace: NamespaceRecord) {
        self.namespaces.insert(namespace.name.clone(), namespace);
    }

    pub fn remove_namespace(&self, name: &str) -> Option<NamespaceRecord> {
        self.namespaces.remove(name).map(|(_, n)| n)
    }

    pub fn workload_count(&self) -> usize {
        self.addresses.len()
    }
}

#[async_trait]
impl WorkloadFinder for StaticFinder {
    async fn find_by_source_address(&self, ctx: &Context, address: &str) -> Result<WorkloadRecord> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        self.by_address
            .get(address)
            .and_then(|records| records.iter().find(|w| !w.phase.is_terminated()).cloned())
            .ok_or(RoleGateError::WorkloadNotFound)
    }
}

#[async_trait]
impl NamespaceFinder for StaticFinder {
    async fn find_by_name(&self, ctx: &Context, name: &str) -> Result<NamespaceRecord> {
        if let Some(err) = ctx.err() {
            return Err(err);
        }
        self.namespaces
            .get(name)
            .map(|n| n.value().clone())
            .ok_or_else(|| RoleGateError::NamespaceNotFound(name.to_string()))
    }
}
