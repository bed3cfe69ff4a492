//! Assume-role policies.
//!
//! A policy answers one question: may the workload at `source_address` assume
//! `requested_role`? It returns a [`Decision`] when it could evaluate its rule
//! and an error when it could not (lookup failure, bad configuration, ended
//! context). Policies are stateless apart from their finder handles and are
//! shared across requests behind `Arc`.

pub mod annotated_role;
pub mod composite;
pub mod namespace;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use rolegate_core::{Context, Decision, Result};

use crate::finder::{NamespaceFinder, WorkloadFinder};

pub use annotated_role::RequestingAnnotatedRolePolicy;
pub use composite::CompositePolicy;
pub use namespace::NamespacePermittedRoleNamePolicy;

#[async_trait]
pub trait Policy: Send + Sync {
    /// Short stable name used in explanations and logs.
    fn name(&self) -> &str;

    async fn is_allowed_assume_role(
        &self,
        ctx: &Context,
        requested_role: &str,
        source_address: &str,
    ) -> Result<Decision>;
}

/// Policies selectable from config, in the order they appear in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    AnnotatedRole,
    NamespacePermitted,
}

impl PolicyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PolicyKind::AnnotatedRole => annotated_role::NAME,
            PolicyKind::NamespacePermitted => namespace::NAME,
        }
    }

    pub fn build(
        self,
        workloads: &Arc<dyn WorkloadFinder>,
        namespaces: &Arc<dyn NamespaceFinder>,
    ) -> Arc<dyn Policy> {
        match self {
            PolicyKind::AnnotatedRole => {
                Arc::new(RequestingAnnotatedRolePolicy::new(Arc::clone(workloads)))
            }
            PolicyKind::NamespacePermitted => Arc::new(NamespacePermittedRoleNamePolicy::new(
                Arc::clone(namespaces),
                Arc::clone(workloads),
            )),
        }
    }
}
