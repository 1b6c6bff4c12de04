// # agh-core
//
// Core library for reconciling AdGuard Home DNS rewrite rules.
//
// ## Architecture Overview
//
// This library provides the fetch -> compare -> apply flow for a single
// DNS rewrite rule (domain -> answer):
// - **RewriteStore**: Trait for listing and mutating rewrite rules
// - **Reconciler**: Drives one idempotent present/absent reconcile run
// - **MemoryRewriteStore**: In-memory store for tests and embedding
//
// The HTTP transport against a real appliance lives in the
// `agh-store-http` crate; the CLI surface lives in `aghctl`.
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Decision logic is separate from transport
// 2. **Stateless Runs**: Every run re-derives state from the listing
// 3. **Fail Fast**: The first failed call ends the run, nothing is retried
// 4. **Library-First**: The reconciler can be embedded without the CLI

pub mod config;
pub mod error;
pub mod reconciler;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use config::{DesiredRewrite, EndpointConfig, Presence};
pub use error::{Error, Result};
pub use reconciler::{ReconcileReport, Reconciler};
pub use store::MemoryRewriteStore;
pub use traits::{RewriteRule, RewriteStore};
