//! Engine config loader (strict parsing).

pub mod schema;

use std::fs;

use rolegate_core::error::{Result, RoleGateError};

pub use schema::{EngineSection, PolicySection, RoleGateConfig};

pub fn load_from_file(path: &str) -> Result<RoleGateConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| RoleGateError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<RoleGateConfig> {
    let cfg: RoleGateConfig = serde_yaml::from_str(s)
        .map_err(|e| RoleGateError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
