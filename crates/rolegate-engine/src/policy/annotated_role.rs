use std::sync::Arc;

use async_trait::async_trait;

use rolegate_core::{Context, Decision, Result};

use crate::finder::WorkloadFinder;

use super::Policy;

pub(crate) const NAME: &str = "annotated_role";

/// Allows a workload to assume exactly the role it is annotated with.
pub struct RequestingAnnotatedRolePolicy {
    workloads: Arc<dyn WorkloadFinder>,
}

impl RequestingAnnotatedRolePolicy {
    pub fn new(workloads: Arc<dyn WorkloadFinder>) -> Self {
        Self { workloads }
    }
}

#[async_trait]
impl Policy for RequestingAnnotatedRolePolicy {
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

        let decision = match workload.role.as_deref() {
            Some(annotated) if annotated == requested_role => Decision::allow(format!(
                "workload {} annotated with requested role '{requested_role}'",
                workload.key()
            )),
            Some(annotated) => Decision::deny(format!(
                "requested '{requested_role}' but workload {} annotated with '{annotated}'",
                workload.key()
            )),
            None => Decision::deny(format!(
                "requested '{requested_role}' but workload {} has no role annotation",
                workload.key()
            )),
        };
        Ok(decision)
    }
}
