//! Top-level facade crate for rolegate.
//!
//! Re-exports core types and the policy engine so users can depend on a single crate.

pub mod core {
    pub use rolegate_core::*;
}

pub mod engine {
    pub use rolegate_engine::*;
}
