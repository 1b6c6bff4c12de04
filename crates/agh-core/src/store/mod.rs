// # Rewrite Store Implementations
//
// This module provides local implementations of the RewriteStore trait.
// The HTTP implementation against a real appliance lives in the
// `agh-store-http` crate.

pub mod memory;

pub use memory::MemoryRewriteStore;
