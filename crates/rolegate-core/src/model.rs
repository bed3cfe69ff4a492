//! Workload and namespace records as handed to the engine by the identity
//! store. Read-only from the engine's point of view.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Workload annotation naming the role the workload wants to assume.
pub const ROLE_ANNOTATION: &str = "iam.amazonaws.com/role";
/// Namespace annotation holding the permitted-role regular expression.
pub const PERMITTED_ANNOTATION: &str = "iam.amazonaws.com/permitted";

/// Lifecycle phase of a workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadPhase {
    Pending,
    #[default]
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl WorkloadPhase {
    /// Finished workloads no longer own their address.
    pub fn is_terminated(self) -> bool {
        matches!(self, WorkloadPhase::Succeeded | WorkloadPhase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkloadPhase::Pending => "pending",
            WorkloadPhase::Running => "running",
            WorkloadPhase::Succeeded => "succeeded",
            WorkloadPhase::Failed => "failed",
            WorkloadPhase::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkloadRecord {
    pub namespace: String,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub phase: WorkloadPhase,
    /// Annotated role, if any.
    #[serde(default)]
    pub role: Option<String>,
}

impl WorkloadRecord {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phase: WorkloadPhase,
        role: Option<&str>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            address: address.into(),
            phase,
            role: role.map(str::to_string),
        }
    }

    /// Build from raw annotations; the role is taken from [`ROLE_ANNOTATION`].
    pub fn from_annotations(
        namespace: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        phase: WorkloadPhase,
        annotations: &BTreeMap<String, String>,
    ) -> Self {
        let role = annotations
            .get(ROLE_ANNOTATION)
            .map(|r| r.trim())
            .filter(|r| !r.is_empty());
        Self::new(namespace, name, address, phase, role)
    }

    /// `namespace/name`, used in explanations and logs.
    pub fn key(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceRecord {
    pub name: String,
    #[serde(default, rename = "permitted_roles")]
    permitted_role_pattern: Option<String>,
}

impl NamespaceRecord {
    pub fn new(name: impl Into<String>, permitted_role_pattern: Option<&str>) -> Self {
        Self {
            name: name.into(),
            permitted_role_pattern: permitted_role_pattern.map(str::to_string),
        }
    }

    /// Build from raw annotations; the pattern is taken from [`PERMITTED_ANNOTATION`].
    pub fn from_annotations(
        name: impl Into<String>,
        annotations: &BTreeMap<String, String>,
    ) -> Self {
        Self::new(name, annotations.get(PERMITTED_ANNOTATION).map(String::as_str))
    }

    /// Permitted-role pattern exactly as annotated. Absent and blank
    /// annotations both yield `None`, which callers must treat as "no roles
    /// permitted".
    pub fn permitted_role_pattern(&self) -> Option<&str> {
        self.permitted_role_pattern
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }
}
