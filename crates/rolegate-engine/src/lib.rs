//! rolegate engine library entry.
//!
//! Wires the identity finders, the assume-role policies and their composition
//! into a `PolicyEngine` the interception layer calls once per credential
//! request. Also hosts the strict YAML config and tracing setup.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod engine;
pub mod finder;
pub mod obs;
pub mod policy;

pub use engine::PolicyEngine;
pub use finder::{NamespaceFinder, WorkloadFinder};
pub use policy::{
    CompositePolicy, NamespacePermittedRoleNamePolicy, Policy, PolicyKind,
    RequestingAnnotatedRolePolicy,
};
