use std::sync::Arc;

use async_trait::async_trait;

use rolegate_core::{Context, Decision, Result, RoleGateError};

use super::Policy;

/// Logical AND over sub-policies.
///
/// Sub-policies run in declaration order. The first denial or error is
/// returned as is and later sub-policies are not evaluated.
pub struct CompositePolicy {
    name: String,
    policies: Vec<Arc<dyn Policy>>,
}

impl CompositePolicy {
    pub fn new(policies: Vec<Arc<dyn Policy>>) -> Result<Self> {
        if policies.is_empty() {
            return Err(RoleGateError::PolicyConfiguration(
                "composite policy needs at least one sub-policy".into(),
            ));
        }
        let mut composite = Self {
            name: String::new(),
            policies,
        };
        composite.rename();
        Ok(composite)
    }

    /// Append a sub-policy evaluated after the existing ones.
    pub fn push(&mut self, policy: Arc<dyn Policy>) {
        self.policies.push(policy);
        self.rename();
    }

    /// Builder form of [`CompositePolicy::push`].
    pub fn and(mut self, policy: Arc<dyn Policy>) -> Self {
        self.push(policy);
        self
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    fn rename(&mut self) {
        let names: Vec<&str> = self.policies.iter().map(|p| p.name()).collect();
        self.name = format!("all_of({})", names.join(", "));
    }
}

#[async_trait]
impl Policy for CompositePolicy {
    fn name(&self) -> &str {
        &self.name
    }

    async fn is_allowed_assume_role(
        &self,
        ctx: &Context,
        requested_role: &str,
        source_address: &str,
    ) -> Result<Decision> {
        let mut reasons = Vec::with_capacity(self.policies.len());
        for policy in &self.policies {
            let decision = policy
                .is_allowed_assume_role(ctx, requested_role, source_address)
                .await?;
            if !decision.is_allowed() {
                tracing::debug!(
                    policy = %policy.name(),
                    role = %requested_role,
                    address = %source_address,
                    "composite short-circuited on denial"
                );
                return Ok(decision);
            }
            reasons.push(format!("{}: {}", policy.name(), decision.explanation()));
        }
        Ok(Decision::allow(reasons.join("; ")))
    }
}
