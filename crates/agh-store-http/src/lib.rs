// # AdGuard Home Rewrite Store
//
// This crate implements the RewriteStore trait against the AdGuard Home
// control API.
//
// ## Implementation Notes
//
// - ✅ One HTTP request per store call
// - ✅ HTTP basic auth on every request
// - ✅ Request timeout from the endpoint configuration (default 30 seconds)
// - ✅ TLS certificate validation on by default, can be disabled per endpoint
// - ✅ Non-success statuses map to API errors carrying the status code
// - ✅ Requests that never reach the appliance map to transport errors
// - ❌ NO retry logic (error policy is owned by the caller)
// - ❌ NO caching (every listing reflects the appliance)
//
// ## Security Requirements
//
// - The basic-auth password NEVER appears in logs or Debug output
//
// ## API Reference
//
// - AdGuard Home control API: https://github.com/AdguardTeam/AdGuardHome/tree/master/openapi
// - List rewrites: GET `/control/rewrite/list`
// - Add rewrite: POST `/control/rewrite/add` with `{"domain": ..., "answer": ...}`
// - Delete rewrite: POST `/control/rewrite/delete` with `{"domain": ..., "answer": ...}`
//
// The delete endpoint matches on the exact (domain, answer) pair, which
// is why the trait requires deletions to carry the recorded answer.

use std::time::Duration;

use agh_core::config::EndpointConfig;
use agh_core::traits::{RewriteRule, RewriteStore};
use agh_core::{Error, Result};
use async_trait::async_trait;

/// Path of the rewrite listing endpoint
const REWRITE_LIST_PATH: &str = "/control/rewrite/list";

/// Path of the rewrite creation endpoint
const REWRITE_ADD_PATH: &str = "/control/rewrite/add";

/// Path of the rewrite deletion endpoint
const REWRITE_DELETE_PATH: &str = "/control/rewrite/delete";

/// AdGuard Home rewrite store
///
/// One instance talks to one appliance. The store is stateless: every
/// call is a single HTTP request, and nothing is cached between calls.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
pub struct HttpRewriteStore {
    /// Base URL of the appliance, without trailing slash
    base_url: String,

    /// Username for HTTP basic auth
    username: String,

    /// Password for HTTP basic auth
    /// ⚠️ NEVER log this value
    password: String,

    /// HTTP client for control API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for HttpRewriteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRewriteStore")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

impl HttpRewriteStore {
    /// Create a store from an endpoint configuration
    ///
    /// Validates the configuration first, then builds the HTTP client
    /// with the configured timeout and TLS behavior.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the endpoint settings are
    /// invalid or the HTTP client cannot be built.
    pub fn new(config: &EndpointConfig) -> Result<Self> {
        config.validate()?;

        if !config.validate_certs {
            tracing::warn!(
                "TLS certificate validation disabled for {}",
                config.base_url()
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.validate_certs)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url().to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }

    /// Full URL for a control API path
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a rule to a mutating endpoint and map the response status
    ///
    /// The add and delete endpoints share one shape: a JSON body with
    /// the (domain, answer) pair, 200 on success, and an error text body
    /// otherwise.
    async fn post_rule(&self, path: &str, rule: &RewriteRule) -> Result<()> {
        let url = self.endpoint(path);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(rule)
            .send()
            .await
            .map_err(|e| Error::transport(format!("POST {} failed: {}", path, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(Error::api(status.as_u16(), body));
        }

        Ok(())
    }
}

#[async_trait]
impl RewriteStore for HttpRewriteStore {
    /// Fetch every rewrite rule the appliance currently holds
    ///
    /// A success status with a body that does not parse as a rule array
    /// is still an API error; the status code is preserved so callers
    /// can tell it apart from transport failures.
    async fn list_rewrites(&self) -> Result<Vec<RewriteRule>> {
        let url = self.endpoint(REWRITE_LIST_PATH);
        tracing::debug!("Listing rewrites from {}", url);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|e| Error::transport(format!("GET {} failed: {}", REWRITE_LIST_PATH, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error response".to_string());
            return Err(Error::api(status.as_u16(), body));
        }

        let body = response.text().await.map_err(|e| {
            Error::api(
                status.as_u16(),
                format!("unable to read response body: {}", e),
            )
        })?;

        let rules: Vec<RewriteRule> = serde_json::from_str(&body).map_err(|e| {
            Error::api(
                status.as_u16(),
                format!("unparsable rewrite list: {}", e),
            )
        })?;

        tracing::debug!("Appliance returned {} rewrite rule(s)", rules.len());
        Ok(rules)
    }

    async fn add_rewrite(&self, rule: &RewriteRule) -> Result<()> {
        tracing::info!("Adding rewrite {} -> {}", rule.domain, rule.answer);
        self.post_rule(REWRITE_ADD_PATH, rule).await
    }

    async fn remove_rewrite(&self, rule: &RewriteRule) -> Result<()> {
        tracing::info!("Deleting rewrite {} -> {}", rule.domain, rule.answer);
        self.post_rule(REWRITE_DELETE_PATH, rule).await
    }

    fn store_name(&self) -> &'static str {
        "adguard-home"
    }
}
