//! Core traits for the rewrite reconciliation system
//!
//! This module defines the abstract interface that all store
//! implementations must follow.
//!
//! - [`RewriteStore`]: List and mutate DNS rewrite rules on a store

pub mod rewrite_store;

pub use rewrite_store::{RewriteRule, RewriteStore};
