//! rolegate core: decision values, identity records, the cancellable request
//! context and the async result cell shared by the policy engine.
//!
//! This crate carries no policy logic of its own. It defines the contracts the
//! engine and the (external) lookup collaborators agree on.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths must surface as `RoleGateError`/`Result` so a bad lookup
//! or a bad annotation never takes the credential path down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod context;
pub mod decision;
pub mod error;
pub mod model;
pub mod result_cell;

pub use context::Context;
pub use decision::Decision;
/// Shared result type.
pub use error::{ErrorCode, Result, RoleGateError};
pub use model::{NamespaceRecord, WorkloadPhase, WorkloadRecord};
pub use result_cell::ResultCell;
