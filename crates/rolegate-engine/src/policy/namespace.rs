//! Namespace whitelist: a namespace annotation carries a regular expression of
//! role names its workloads may assume.
//!
//! The pattern must match the whole requested role (`^(?:pattern)$`). A
//! namespace without the annotation permits nothing. A pattern that does not
//! compile is reported as `RoleGateError::PolicyConfiguration` rather than
//! folded into a denial, so operators see the broken annotation.

use std::sync::Arc;

use async_trait::async_trait;
use regex::Regex;

use rolegate_core::{Context, Decision, Result, RoleGateError};

use crate::finder::{NamespaceFinder, WorkloadFinder};

use super::Policy;

pub(crate) const NAME: &str = "namespace_permitted";

/// Explanation returned when the namespace carries no pattern.
pub const NO_ANNOTATION: &str = "no namespace role policy annotation";

pub struct NamespacePermittedRoleNamePolicy {
    namespaces: Arc<dyn NamespaceFinder>,
    workloads: Arc<dyn WorkloadFinder>,
}

impl NamespacePermittedRoleNamePolicy {
    pub fn new(namespaces: Arc<dyn NamespaceFinder>, workloads: Arc<dyn WorkloadFinder>) -> Self {
        Self {
            namespaces,
            workloads,
        }
    }
}

/// Compile `pattern` anchored to the full input.
pub fn compile_permitted(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})$"))
}

#[async_trait]
impl Policy for NamespacePermittedRoleNamePolicy {
    fn name(&self) -> &str {
        NAME
    }

    async fn is_allowed_assume_role(
        &self,
        ctx: &Context,
        requested_role: &str,
        source_address: &str,
    ) -> Result<Decision> {
        let workload = self
            .workloads
            .find_by_source_address(ctx, source_address)
            .await?;
        let namespace = self.namespaces.find_by_name(ctx, &workload.namespace).await?;

        let Some(pattern) = namespace.permitted_role_pattern() else {
            return Ok(Decision::deny(NO_ANNOTATION));
        };

        let re = compile_permitted(pattern).map_err(|e| {
            tracing::warn!(
                namespace = %namespace.name,
                %pattern,
                error = %e,
                "invalid permitted role pattern"
            );
            RoleGateError::PolicyConfiguration(format!(
                "namespace {} permitted role pattern '{pattern}' is invalid: {e}",
                namespace.name
            ))
        })?;

        if re.is_match(requested_role) {
            Ok(Decision::allow(format!(
                "namespace {} permits '{requested_role}' (pattern '{pattern}')",
                namespace.name
            )))
        } else {
            Ok(Decision::deny(format!(
                "namespace {} pattern '{pattern}' does not match requested role '{requested_role}'",
                namespace.name
            )))
        }
    }
}
