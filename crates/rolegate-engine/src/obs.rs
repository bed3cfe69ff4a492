//! Tracing setup for the embedding process.

use tracing_subscriber::{fmt, EnvFilter};

use rolegate_core::error::{Result, RoleGateError};

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Fails instead of panicking when a global subscriber is already set.
pub fn init_tracing() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| RoleGateError::Internal(format!("tracing init failed: {e}")))
}
