use std::collections::HashSet;
use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;

use rolegate_core::error::{Result, RoleGateError};
use rolegate_core::{NamespaceRecord, WorkloadRecord};

use crate::policy::PolicyKind;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleGateConfig {
    pub version: u32,

    #[serde(default)]
    pub engine: EngineSection,

    pub policy: PolicySection,

    /// Fixture records for the in-memory finder.
    #[serde(default)]
    pub namespaces: Vec<NamespaceRecord>,

    #[serde(default)]
    pub workloads: Vec<WorkloadRecord>,
}

impl RoleGateConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(RoleGateError::UnsupportedVersion);
        }

        self.engine.validate()?;
        self.policy.validate()?;

        let mut seen = HashSet::new();
        for ns in &self.namespaces {
            if ns.name.is_empty() {
                return Err(RoleGateError::BadConfig("namespaces[].name must not be empty".into()));
            }
            if !seen.insert(ns.name.as_str()) {
                return Err(RoleGateError::BadConfig(format!(
                    "duplicate namespace: {}",
                    ns.name
                )));
            }
        }

        let mut seen = HashSet::new();
        for w in &self.workloads {
            if w.namespace.is_empty() || w.name.is_empty() {
                return Err(RoleGateError::BadConfig(
                    "workloads[] need both namespace and name".into(),
                ));
            }
            if w.address.parse::<IpAddr>().is_err() {
                return Err(RoleGateError::BadConfig(format!(
                    "workload {} has invalid address: {}",
                    w.key(),
                    w.address
                )));
            }
            if !seen.insert(w.key()) {
                return Err(RoleGateError::BadConfig(format!("duplicate workload: {}", w.key())));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Upper bound for one whole evaluation, lookups included.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl EngineSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=60000).contains(&self.request_timeout_ms) {
            return Err(RoleGateError::BadConfig(
                "engine.request_timeout_ms must be between 1 and 60000".into(),
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

fn default_request_timeout_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicySection {
    /// Evaluated left to right; all must allow.
    pub chain: Vec<PolicyKind>,
}

impl PolicySection {
    pub fn validate(&self) -> Result<()> {
        if self.chain.is_empty() {
            return Err(RoleGateError::BadConfig("policy.chain must not be empty".into()));
        }
        let mut seen = HashSet::new();
        for kind in &self.chain {
            if !seen.insert(*kind) {
                return Err(RoleGateError::BadConfig(format!(
                    "policy.chain lists {} twice",
                    kind.as_str()
                )));
            }
        }
        Ok(())
    }
}
