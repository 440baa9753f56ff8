use proxyprobe_core::{ProbeError, ProbeResult, PROXY_PATH};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Everything needed to reach the proxy for one probe run.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Project base URL, e.g. `https://<ref>.supabase.co`.
    pub base_url: String,
    /// Static bearer token (the project's anon key).
    pub token: String,
    /// Agent ID or share ID, depending on the flow.
    pub identifier: String,
}

impl ProxyConfig {
    /// Creates a config from its three recognized options.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            identifier: identifier.into(),
        }
    }

    /// Full URL of the proxy function.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), PROXY_PATH)
    }

    /// Checks the base URL and token. The identifier is checked by the
    /// probe flow, which knows whether it is an agent or a share ID.
    pub fn validate(&self) -> ProbeResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ProbeError::Config("base_url is not set".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ProbeError::Config(format!(
                "base_url '{base}' must start with http:// or https://"
            )));
        }
        if self.token.trim().is_empty() {
            return Err(ProbeError::Config("token is not set".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("base_url", &self.base_url)
            .field("token", &"<redacted>")
            .field("identifier", &self.identifier)
            .finish()
    }
}
