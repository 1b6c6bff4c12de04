//! Rewrite reconciler
//!
//! The Reconciler owns the fetch -> compare -> apply flow for a single
//! DNS rewrite rule:
//! - Validate the desired state (before any API call)
//! - List the rules the store currently holds
//! - Compute the action that closes the gap (keep, create, replace,
//!   delete, or nothing)
//! - Apply it, unless running in dry-run mode
//! - Report what happened (changed flag, message, resulting rule)
//!
//! ## Update Semantics
//!
//! The control API has no update verb, so replacing a rule's answer is a
//! delete of the recorded (domain, answer) pair followed by a create with
//! the new answer. Between the two calls the store holds no rule for the
//! domain, and a create failure after a successful delete leaves the rule
//! deleted. The caller sees the error either way; nothing is rolled back.
//!
//! ## Statelessness
//!
//! Every run re-derives the current state from the listing. Nothing is
//! cached between runs, so repeated runs with the same desired state
//! converge: the first may mutate, the rest report no change.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{DesiredRewrite, Presence};
use crate::error::Result;
use crate::traits::{RewriteRule, RewriteStore};

/// Outcome of one reconcile run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Whether the store was (or, in dry-run, would have been) mutated
    pub changed: bool,

    /// Human-readable outcome, stable across versions
    pub message: String,

    /// The rule that satisfies the desired state, when one exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<RewriteRule>,
}

impl ReconcileReport {
    fn new(changed: bool, message: &str, rewrite: Option<RewriteRule>) -> Self {
        Self {
            changed,
            message: message.to_string(),
            rewrite,
        }
    }

    /// Serialize the report as pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// What a reconcile run decided to do, before any mutation
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReconcileAction {
    /// Present, and the recorded answer already matches
    Keep { existing: RewriteRule },

    /// Present, and no rule for the domain exists
    Create { rule: RewriteRule },

    /// Present, but the recorded answer differs: delete then create
    Replace {
        existing: RewriteRule,
        rule: RewriteRule,
    },

    /// Absent, and a rule exists: delete it with its recorded answer
    Delete { existing: RewriteRule },

    /// Absent, and no rule exists
    Nothing,
}

/// Reconciler for a single DNS rewrite rule
///
/// ## Dry-Run Mode
///
/// When `dry_run` is true the reconciler runs the same listing and
/// decision logic but skips the mutating calls. The report's `changed`
/// flag and message describe what a live run would have done.
///
/// ## Error Policy
///
/// Calls run strictly in order and the first failure ends the run. The
/// reconciler never retries and never rolls back calls that already
/// committed; callers that want another attempt run it again.
pub struct Reconciler {
    /// Store holding the rewrite rules
    store: Box<dyn RewriteStore>,

    /// Dry-run mode: if true, list but never mutate
    dry_run: bool,
}

impl Reconciler {
    /// Create a new reconciler
    pub fn new(store: Box<dyn RewriteStore>, dry_run: bool) -> Self {
        Self { store, dry_run }
    }

    /// Create a reconciler in live mode
    ///
    /// This is a convenience method that creates a reconciler which
    /// applies its decisions.
    pub fn new_live(store: Box<dyn RewriteStore>) -> Self {
        Self::new(store, false)
    }

    /// Create a reconciler in dry-run mode
    ///
    /// This is a convenience method that creates a reconciler which
    /// reports its decisions without mutating the store.
    pub fn new_dry_run(store: Box<dyn RewriteStore>) -> Self {
        Self::new(store, true)
    }

    /// Reconcile the desired state against the store
    ///
    /// # Returns
    ///
    /// - `Ok(ReconcileReport)`: What happened (or would happen, in
    ///   dry-run mode)
    /// - `Err(Error)`: Validation failure before any call, or the first
    ///   failed store call
    pub async fn reconcile(&self, desired: &DesiredRewrite) -> Result<ReconcileReport> {
        desired.validate()?;

        info!(
            "Reconciling rewrite for {} [mode: {}]",
            desired.domain,
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let action = self.plan(desired).await?;
        debug!("Planned action for {}: {:?}", desired.domain, action);

        if !self.dry_run {
            self.apply(&action).await?;
        }

        Ok(Self::report(action))
    }

    /// Decide what to do, based on the current listing
    async fn plan(&self, desired: &DesiredRewrite) -> Result<ReconcileAction> {
        let rewrites = self.store.list_rewrites().await?;
        debug!(
            "Store {} holds {} rewrite rule(s)",
            self.store.store_name(),
            rewrites.len()
        );

        // First rule for the domain wins; later duplicates are ignored.
        let existing = rewrites.into_iter().find(|r| r.domain == desired.domain);

        let action = match (desired.presence, existing) {
            (Presence::Present, None) => ReconcileAction::Create {
                rule: desired.to_rule()?,
            },
            (Presence::Present, Some(existing)) => {
                let rule = desired.to_rule()?;
                if existing.answer == rule.answer {
                    ReconcileAction::Keep { existing }
                } else {
                    ReconcileAction::Replace { existing, rule }
                }
            }
            (Presence::Absent, Some(existing)) => ReconcileAction::Delete { existing },
            (Presence::Absent, None) => ReconcileAction::Nothing,
        };

        Ok(action)
    }

    /// Apply a planned action against the store
    async fn apply(&self, action: &ReconcileAction) -> Result<()> {
        match action {
            ReconcileAction::Create { rule } => {
                info!("Creating rewrite {} -> {}", rule.domain, rule.answer);
                self.store.add_rewrite(rule).await
            }
            ReconcileAction::Replace { existing, rule } => {
                // No update verb on the appliance: delete the recorded
                // pair, then create the new one. A failure in between
                // leaves the rule deleted.
                info!(
                    "Replacing rewrite {}: {} -> {}",
                    rule.domain, existing.answer, rule.answer
                );
                self.store.remove_rewrite(existing).await?;
                self.store.add_rewrite(rule).await
            }
            ReconcileAction::Delete { existing } => {
                info!(
                    "Deleting rewrite {} -> {}",
                    existing.domain, existing.answer
                );
                self.store.remove_rewrite(existing).await
            }
            ReconcileAction::Keep { .. } | ReconcileAction::Nothing => Ok(()),
        }
    }

    /// Build the report for a planned (and, unless dry-run, applied)
    /// action
    fn report(action: ReconcileAction) -> ReconcileReport {
        match action {
            ReconcileAction::Create { rule } => {
                ReconcileReport::new(true, "DNS rewrite created successfully", Some(rule))
            }
            ReconcileAction::Replace { rule, .. } => {
                ReconcileReport::new(true, "DNS rewrite updated successfully", Some(rule))
            }
            ReconcileAction::Keep { existing } => ReconcileReport::new(
                false,
                "DNS rewrite already exists with same values",
                Some(existing),
            ),
            ReconcileAction::Delete { .. } => {
                ReconcileReport::new(true, "DNS rewrite deleted successfully", None)
            }
            ReconcileAction::Nothing => {
                ReconcileReport::new(false, "DNS rewrite does not exist", None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_json_includes_rewrite_when_present() {
        let report = ReconcileReport::new(
            true,
            "DNS rewrite created successfully",
            Some(RewriteRule::new("a.test", "10.0.0.1")),
        );

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["changed"], true);
        assert_eq!(value["message"], "DNS rewrite created successfully");
        assert_eq!(value["rewrite"]["domain"], "a.test");
        assert_eq!(value["rewrite"]["answer"], "10.0.0.1");
    }

    #[test]
    fn test_report_json_omits_missing_rewrite() {
        let report = ReconcileReport::new(false, "DNS rewrite does not exist", None);

        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("rewrite").is_none());
        assert_eq!(value["changed"], false);
    }
}
