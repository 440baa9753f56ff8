//! Layered settings: TOML file, then `PROXYPROBE_*` environment variables,
//! then command-line flags.

use proxyprobe_client::ProxyConfig;
use proxyprobe_core::{IdentifierKind, ProbeError, ProbeResult, DEFAULT_MESSAGE};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Config file read when `--config` is not given. It may be absent.
pub const DEFAULT_CONFIG_PATH: &str = "proxyprobe.toml";

/// One layer of settings. Every field is optional so layers can be merged.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub share_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl Settings {
    /// Reads a TOML settings file.
    ///
    /// A missing file is an error only when `required` is set, i.e. when the
    /// user named the file explicitly.
    pub async fn from_file(path: &Path, required: bool) -> ProbeResult<Self> {
        let text = match tokio::fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                debug!(path = %path.display(), "No config file; using env and flags");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ProbeError::Config(format!(
                    "Failed to read config file '{}': {e}",
                    path.display()
                )));
            }
        };
        let settings: Settings = toml::from_str(&text).map_err(|e| {
            ProbeError::Config(format!("Invalid config file '{}': {e}", path.display()))
        })?;
        info!(path = %path.display(), "Loaded config file");
        Ok(settings)
    }

    /// Reads the `PROXYPROBE_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the `PROXYPROBE_*` keys through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        Self {
            base_url: get("PROXYPROBE_BASE_URL"),
            token: get("PROXYPROBE_TOKEN"),
            agent_id: get("PROXYPROBE_AGENT_ID"),
            share_id: get("PROXYPROBE_SHARE_ID"),
            message: None,
        }
    }

    /// Merges `higher` on top of `self`; set fields in `higher` win.
    pub fn overlay(self, higher: Settings) -> Settings {
        Settings {
            base_url: higher.base_url.or(self.base_url),
            token: higher.token.or(self.token),
            agent_id: higher.agent_id.or(self.agent_id),
            share_id: higher.share_id.or(self.share_id),
            message: higher.message.or(self.message),
        }
    }

    /// The identifier for the flow keyed on `kind`, or its placeholder when unset.
    pub fn identifier(&self, kind: IdentifierKind) -> String {
        match kind {
            IdentifierKind::Agent => self.agent_id.clone(),
            IdentifierKind::Share => self.share_id.clone(),
        }
        .unwrap_or_else(|| kind.placeholder().to_string())
    }

    /// Resolves the final client config and message for the flow keyed on `kind`.
    ///
    /// The identifier is checked before anything else, so a placeholder
    /// yields the guidance error even when base_url or token are missing.
    pub fn resolve(self, kind: IdentifierKind) -> ProbeResult<(ProxyConfig, String)> {
        let identifier = self.identifier(kind);
        kind.check(&identifier)?;

        let base_url = self.base_url.ok_or_else(|| {
            ProbeError::Config(
                "base_url is not set (use --base-url, PROXYPROBE_BASE_URL or base_url in the config file)"
                    .into(),
            )
        })?;
        let token = self.token.ok_or_else(|| {
            ProbeError::Config(
                "token is not set (use --token, PROXYPROBE_TOKEN or token in the config file)"
                    .into(),
            )
        })?;
        let message = self.message.unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        Ok((ProxyConfig::new(base_url, token, identifier), message))
    }
}
