// # Memory Rewrite Store
//
// In-memory implementation of RewriteStore.
//
// ## Purpose
//
// Backs tests and embedded usage with a store that behaves like the
// appliance without any network:
//
// - Listing preserves insertion order
// - Several rules for the same domain are representable
// - Deletion matches on the exact (domain, answer) pair and fails for
//   pairs the store does not hold
//
// ## When to Use
//
// - Unit and contract tests
// - Embedding the reconciler without an appliance
// - Demos

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::{RewriteRule, RewriteStore};

/// In-memory rewrite store implementation
///
/// Rules live in a Vec protected by a RwLock. A Vec rather than a map:
/// listing order is part of the store contract (callers take the first
/// match for a domain) and duplicate domains must stay representable.
///
/// # Example
///
/// ```rust,no_run
/// use agh_core::store::MemoryRewriteStore;
/// use agh_core::traits::{RewriteRule, RewriteStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryRewriteStore::new();
///
///     let rule = RewriteRule::new("nas.lan", "10.0.0.15");
///     store.add_rewrite(&rule).await?;
///
///     let rules = store.list_rewrites().await?;
///     assert_eq!(rules, vec![rule]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct MemoryRewriteStore {
    inner: Arc<RwLock<Vec<RewriteRule>>>,
}

impl MemoryRewriteStore {
    /// Create a new empty memory rewrite store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store preloaded with rules, kept in the given order
    pub fn with_rules(rules: Vec<RewriteRule>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(rules)),
        }
    }

    /// Get the number of rules in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Clear all rules from the store
    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

impl Default for MemoryRewriteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RewriteStore for MemoryRewriteStore {
    async fn list_rewrites(&self) -> Result<Vec<RewriteRule>, Error> {
        let guard = self.inner.read().await;
        Ok(guard.clone())
    }

    async fn add_rewrite(&self, rule: &RewriteRule) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        guard.push(rule.clone());
        Ok(())
    }

    async fn remove_rewrite(&self, rule: &RewriteRule) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        match guard.iter().position(|r| r == rule) {
            Some(idx) => {
                guard.remove(idx);
                Ok(())
            }
            // The appliance rejects deletes for pairs it does not hold
            None => Err(Error::api(
                400,
                format!("no rewrite rule for {} -> {}", rule.domain, rule.answer),
            )),
        }
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
