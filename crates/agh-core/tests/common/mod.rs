//! Test doubles and common utilities for reconciler contract tests
//!
//! This module provides a minimal RewriteStore double that records every
//! call so tests can verify what the reconciler did, in what order, and
//! nothing more.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use agh_core::error::Result;
use agh_core::traits::{RewriteRule, RewriteStore};

/// A mutating call the store saw, in arrival order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Add(RewriteRule),
    Remove(RewriteRule),
}

/// A RewriteStore double that records every call
///
/// Rules behave like the appliance's: listing preserves order, deletion
/// matches the exact (domain, answer) pair. Failures can be injected per
/// method to exercise fail-fast paths; an injected failure still records
/// the call, so tests can assert that a call was issued and rejected.
pub struct RecordingStore {
    /// Rules the store currently holds
    rules: Arc<Mutex<Vec<RewriteRule>>>,
    /// Call counter for list_rewrites()
    list_call_count: Arc<AtomicUsize>,
    /// Mutating calls in the order they arrived
    ops: Arc<Mutex<Vec<StoreOp>>>,
    /// When set, list_rewrites fails with this status
    fail_list_status: Arc<Mutex<Option<u16>>>,
    /// When set, add_rewrite fails with this status
    fail_add_status: Arc<Mutex<Option<u16>>>,
    /// When set, remove_rewrite fails with this status
    fail_remove_status: Arc<Mutex<Option<u16>>>,
}

impl RecordingStore {
    /// Create an empty recording store
    pub fn new() -> Self {
        Self::with_rules(Vec::new())
    }

    /// Create a recording store preloaded with rules
    pub fn with_rules(rules: Vec<RewriteRule>) -> Self {
        Self {
            rules: Arc::new(Mutex::new(rules)),
            list_call_count: Arc::new(AtomicUsize::new(0)),
            ops: Arc::new(Mutex::new(Vec::new())),
            fail_list_status: Arc::new(Mutex::new(None)),
            fail_add_status: Arc::new(Mutex::new(None)),
            fail_remove_status: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a new RecordingStore that shares rules, counters, and the
    /// op log with an existing one
    pub fn sharing_state_with(other: &Self) -> Self {
        Self {
            rules: Arc::clone(&other.rules),
            list_call_count: Arc::clone(&other.list_call_count),
            ops: Arc::clone(&other.ops),
            fail_list_status: Arc::clone(&other.fail_list_status),
            fail_add_status: Arc::clone(&other.fail_add_status),
            fail_remove_status: Arc::clone(&other.fail_remove_status),
        }
    }

    /// Get the number of times list_rewrites() was called
    pub fn list_call_count(&self) -> usize {
        self.list_call_count.load(Ordering::SeqCst)
    }

    /// Get the mutating calls seen so far, in order
    pub fn ops(&self) -> Vec<StoreOp> {
        self.ops.lock().unwrap().clone()
    }

    /// Get the number of mutating calls seen so far
    pub fn mutation_count(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    /// Get the rules the store currently holds
    pub fn rules(&self) -> Vec<RewriteRule> {
        self.rules.lock().unwrap().clone()
    }

    /// Make every list_rewrites() call fail with the given status
    pub fn fail_lists_with(&self, status: u16) {
        *self.fail_list_status.lock().unwrap() = Some(status);
    }

    /// Make every add_rewrite() call fail with the given status
    pub fn fail_adds_with(&self, status: u16) {
        *self.fail_add_status.lock().unwrap() = Some(status);
    }

    /// Make every remove_rewrite() call fail with the given status
    pub fn fail_removes_with(&self, status: u16) {
        *self.fail_remove_status.lock().unwrap() = Some(status);
    }
}

#[async_trait::async_trait]
impl RewriteStore for RecordingStore {
    async fn list_rewrites(&self) -> Result<Vec<RewriteRule>> {
        self.list_call_count.fetch_add(1, Ordering::SeqCst);
        if let Some(status) = *self.fail_list_status.lock().unwrap() {
            return Err(agh_core::Error::api(status, "injected list failure"));
        }
        Ok(self.rules.lock().unwrap().clone())
    }

    async fn add_rewrite(&self, rule: &RewriteRule) -> Result<()> {
        self.ops.lock().unwrap().push(StoreOp::Add(rule.clone()));
        if let Some(status) = *self.fail_add_status.lock().unwrap() {
            return Err(agh_core::Error::api(status, "injected add failure"));
        }
        self.rules.lock().unwrap().push(rule.clone());
        Ok(())
    }

    async fn remove_rewrite(&self, rule: &RewriteRule) -> Result<()> {
        self.ops.lock().unwrap().push(StoreOp::Remove(rule.clone()));
        if let Some(status) = *self.fail_remove_status.lock().unwrap() {
            return Err(agh_core::Error::api(status, "injected remove failure"));
        }
        let mut rules = self.rules.lock().unwrap();
        if let Some(idx) = rules.iter().position(|r| r == rule) {
            rules.remove(idx);
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "recording"
    }
}
