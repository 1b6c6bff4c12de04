// # Rewrite Store Trait
//
// Defines the interface for listing and mutating DNS rewrite rules.
//
// ## Implementations
//
// - AdGuard Home control API: `agh-store-http` crate
// - In-memory: `MemoryRewriteStore` in this crate (tests, embedding)
//
// ## Usage
//
// ```rust,ignore
// use agh_core::traits::{RewriteRule, RewriteStore};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let store = /* RewriteStore implementation */;
//
//     let rules = store.list_rewrites().await?;
//     store.add_rewrite(&RewriteRule::new("nas.lan", "10.0.0.15")).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One DNS rewrite rule as the store holds it
///
/// This is also the wire shape of the control API's add/delete bodies
/// and of each element in the listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Domain the rewrite answers for
    pub domain: String,
    /// Rewrite target: an IP address or a CNAME-style hostname
    pub answer: String,
}

impl RewriteRule {
    /// Create a new rewrite rule
    pub fn new(domain: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            answer: answer.into(),
        }
    }
}

/// Trait for rewrite store implementations
///
/// This trait defines the interface for reading and mutating the set of
/// rewrite rules a store holds. Implementations handle the specifics of
/// their transport; they perform one operation per call and no retry
/// (error policy is owned by the caller).
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Ordering
///
/// [`list_rewrites`](RewriteStore::list_rewrites) returns rules in the
/// store's listing order. Callers resolve duplicate domains by taking
/// the first match, so implementations must not reorder.
#[async_trait]
pub trait RewriteStore: Send + Sync {
    /// Fetch every rewrite rule the store currently holds
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<RewriteRule>)`: All rules, in listing order
    /// - `Err(Error)`: If the listing failed or the response was unusable
    async fn list_rewrites(&self) -> Result<Vec<RewriteRule>, crate::Error>;

    /// Create a new rewrite rule
    ///
    /// The store does not enforce domain uniqueness; callers decide
    /// whether a rule for the same domain already exists.
    async fn add_rewrite(&self, rule: &RewriteRule) -> Result<(), crate::Error>;

    /// Delete a rewrite rule
    ///
    /// Matching is on the exact (domain, answer) pair, so deletions must
    /// be issued with the answer the store currently holds for the rule.
    async fn remove_rewrite(&self, rule: &RewriteRule) -> Result<(), crate::Error>;

    /// Get the store name (for logging/debugging)
    fn store_name(&self) -> &'static str;
}
