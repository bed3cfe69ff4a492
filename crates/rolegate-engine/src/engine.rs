//! Policy engine facade for the interception layer.
//!
//! Built once at startup, then shared via `Arc`. Each call to
//! [`PolicyEngine::authorize`] runs the configured policy chain under a child
//! context bounded by the configured request timeout.

use std::sync::Arc;
use std::time::Duration;

use rolegate_core::{Context, Decision, Result};

use crate::config::RoleGateConfig;
use crate::finder::{NamespaceFinder, StaticFinder, WorkloadFinder};
use crate::policy::{CompositePolicy, Policy};

pub struct PolicyEngine {
    policy: Arc<dyn Policy>,
    request_timeout: Duration,
}

impl PolicyEngine {
    pub fn new(policy: Arc<dyn Policy>, request_timeout: Duration) -> Self {
        Self {
            policy,
            request_timeout,
        }
    }

    /// Build the chain from config against externally supplied finders.
    pub fn with_finders(
        cfg: &RoleGateConfig,
        workloads: Arc<dyn WorkloadFinder>,
        namespaces: Arc<dyn NamespaceFinder>,
    ) -> Result<Self> {
        let chain = cfg
            .policy
            .chain
            .iter()
            .map(|kind| kind.build(&workloads, &namespaces))
            .collect();
        let policy = CompositePolicy::new(chain)?;

        tracing::info!(
            policy = %policy.name(),
            request_timeout_ms = cfg.engine.request_timeout_ms,
            "policy engine built"
        );
        Ok(Self::new(Arc::new(policy), cfg.engine.request_timeout()))
    }

    /// Build the chain against an in-memory finder seeded from the config's
    /// fixture records.
    pub fn from_config(cfg: &RoleGateConfig) -> Result<(Self, Arc<StaticFinder>)> {
        let finder = Arc::new(StaticFinder::from_records(
            cfg.workloads.iter().cloned(),
            cfg.namespaces.iter().cloned(),
        ));
        let workloads: Arc<dyn WorkloadFinder> = finder.clone();
        let namespaces: Arc<dyn NamespaceFinder> = finder.clone();
        let engine = Self::with_finders(cfg, workloads, namespaces)?;
        Ok((engine, finder))
    }

    pub fn policy(&self) -> &dyn Policy {
        self.policy.as_ref()
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Evaluate the chain for one request.
    ///
    /// Errors mean the request could not be evaluated; they are never turned
    /// into denials here.
    pub async fn authorize(
        &self,
        ctx: &Context,
        requested_role: &str,
        source_address: &str,
    ) -> Result<Decision> {
        let ctx = ctx.with_timeout(self.request_timeout);
        match self
            .policy
            .is_allowed_assume_role(&ctx, requested_role, source_address)
            .await
        {
            Ok(decision) => {
                tracing::debug!(
                    policy = %self.policy.name(),
                    role = %requested_role,
                    address = %source_address,
                    allowed = decision.is_allowed(),
                    explanation = %decision.explanation(),
                    "assume role decision"
                );
                Ok(decision)
            }
            Err(e) => {
                tracing::warn!(
                    policy = %self.policy.name(),
                    role = %requested_role,
                    address = %source_address,
                    code = e.code().as_str(),
                    error = %e,
                    "assume role evaluation failed"
                );
                Err(e)
            }
        }
    }
}
