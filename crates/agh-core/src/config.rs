//! Configuration types for the rewrite reconciliation system
//!
//! This module defines the endpoint settings for an AdGuard Home control
//! API and the desired state of a single rewrite rule.

use serde::{Deserialize, Serialize};

use crate::traits::RewriteRule;

/// Connection settings for an AdGuard Home control API endpoint
#[derive(Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Base URL of the appliance (e.g., "https://adguard.example.net:3000")
    pub url: String,

    /// Username for HTTP basic auth
    pub username: String,

    /// Password for HTTP basic auth
    /// ⚠️ NEVER log this value
    pub password: String,

    /// Whether to verify the appliance TLS certificate
    #[serde(default = "default_validate_certs")]
    pub validate_certs: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("validate_certs", &self.validate_certs)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl EndpointConfig {
    /// Create a new endpoint configuration with default TLS and timeout
    /// settings
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            validate_certs: default_validate_certs(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Enable or disable TLS certificate validation
    pub fn with_validate_certs(mut self, validate_certs: bool) -> Self {
        self.validate_certs = validate_certs;
        self
    }

    /// Set the request timeout in seconds
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Base URL without trailing slashes, ready for path concatenation
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Validate the endpoint configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.url.is_empty() {
            return Err(crate::Error::config("Endpoint URL cannot be empty"));
        }

        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err(crate::Error::config(format!(
                "Endpoint URL must use HTTP or HTTPS scheme. Got: {}",
                self.url
            )));
        }

        if self.username.is_empty() {
            return Err(crate::Error::config("Username cannot be empty"));
        }

        if self.password.is_empty() {
            return Err(crate::Error::config("Password cannot be empty"));
        }

        if !(1..=300).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "Timeout must be between 1 and 300 seconds. Got: {}",
                self.timeout_secs
            )));
        }

        Ok(())
    }
}

/// Whether a rewrite rule should exist on the appliance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    /// The rule must exist with the given answer
    #[default]
    Present,
    /// The rule must not exist
    Absent,
}

/// Desired state of a single DNS rewrite rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesiredRewrite {
    /// Domain the rewrite answers for (exact, case-sensitive match)
    pub domain: String,

    /// Rewrite target: an IP address or a CNAME-style hostname
    ///
    /// Required when presence is `Present`, ignored when `Absent`.
    #[serde(default)]
    pub answer: Option<String>,

    /// Whether the rule should exist on the appliance
    #[serde(default)]
    pub presence: Presence,
}

impl DesiredRewrite {
    /// Create a desired rewrite with presence `Present` and no answer yet
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            answer: None,
            presence: Presence::Present,
        }
    }

    /// Set the answer
    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    /// Set the presence
    pub fn with_presence(mut self, presence: Presence) -> Self {
        self.presence = presence;
        self
    }

    /// Validate the desired state
    ///
    /// Rejects an empty domain, and a `Present` state without an answer.
    /// Runs before any API call so inconsistent input never reaches the
    /// appliance.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.domain.is_empty() {
            return Err(crate::Error::validation("Domain cannot be empty"));
        }

        if self.presence == Presence::Present
            && self.answer.as_deref().is_none_or(|a| a.is_empty())
        {
            return Err(crate::Error::validation(
                "answer is required when state is present",
            ));
        }

        Ok(())
    }

    /// The rule this desired state describes
    ///
    /// Fails for a `Present` state without an answer, the same condition
    /// `validate` rejects.
    pub fn to_rule(&self) -> Result<RewriteRule, crate::Error> {
        match self.answer.as_deref() {
            Some(answer) if !answer.is_empty() => {
                Ok(RewriteRule::new(self.domain.clone(), answer))
            }
            _ => Err(crate::Error::validation(
                "answer is required when state is present",
            )),
        }
    }
}

fn default_validate_certs() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}
