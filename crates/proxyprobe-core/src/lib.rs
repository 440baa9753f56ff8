//! Core types and error definitions for proxyprobe.
//!
//! This crate holds everything that describes the exchange with the proxy
//! edge function without performing any I/O.
//!
//! # Main types
//!
//! - [`ProbeError`] — Tagged error surfaced by every probe operation.
//! - [`ProbeResult`] — Convenience alias for `Result<T, ProbeError>`.
//! - [`IdentifierKind`] — Which identifier a flow targets (agent or share ID).
//! - [`payload`] — JSON request bodies accepted by the proxy.
//! - [`response`] — Captured HTTP responses and the typed reply view.

/// JSON request bodies sent to the proxy.
pub mod payload;
/// HTTP response capture and reply parsing.
pub mod response;

pub use payload::{CreateSessionRequest, SharedMessageRequest, UpdateSessionRequest};
pub use response::{DebugInfo, ProxyReply, ProxyResponse, ResponseBody};

use std::fmt;

/// Message sent into a session when the caller does not supply one.
pub const DEFAULT_MESSAGE: &str = "Hello, this is a test message";

/// Path of the proxy function relative to the project base URL.
pub const PROXY_PATH: &str = "/functions/v1/proxy";

// --- Error types ---

/// Top-level error type for proxyprobe.
///
/// Non-JSON response bodies are not errors; they are kept as
/// [`ResponseBody::Text`].
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// The request could not be delivered (connect, DNS, TLS, reset).
    #[error("{0}")]
    Network(String),

    /// The response body could not be read, or a payload could not be encoded.
    #[error("{0}")]
    Decode(String),

    /// Anything the other variants do not describe.
    #[error("{0}")]
    Unexpected(String),

    /// Missing or invalid configuration.
    #[error("{0}")]
    Config(String),

    /// The identifier was left at its template placeholder.
    #[error("Please replace '{value}' with an actual {kind}")]
    Placeholder {
        /// Which identifier was not filled in.
        kind: IdentifierKind,
        /// The placeholder value found.
        value: String,
    },

    /// Writing the console report failed.
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

impl ProbeError {
    /// Label printed in front of the error message in the console report.
    pub fn label(&self) -> &'static str {
        match self {
            ProbeError::Network(_) => "Request Error",
            ProbeError::Decode(_) => "Decode Error",
            ProbeError::Unexpected(_) => "Unexpected Error",
            ProbeError::Config(_) => "Config Error",
            ProbeError::Placeholder { .. } => "Placeholder",
            ProbeError::Io(_) => "Output Error",
        }
    }

    /// Whether this is the placeholder guard rather than a failure.
    pub fn is_guidance(&self) -> bool {
        matches!(self, ProbeError::Placeholder { .. })
    }
}

impl From<serde_json::Error> for ProbeError {
    fn from(err: serde_json::Error) -> Self {
        ProbeError::Decode(err.to_string())
    }
}

/// A convenience `Result` alias using [`ProbeError`].
pub type ProbeResult<T> = Result<T, ProbeError>;

// --- Identifiers ---

/// The identifier a probe flow is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// An agent ID, used by the session probe.
    Agent,
    /// A share ID, used by the shared-message probe.
    Share,
}

impl IdentifierKind {
    /// The sentinel value shipped in config templates.
    pub fn placeholder(self) -> &'static str {
        match self {
            IdentifierKind::Agent => "your-agent-id-here",
            IdentifierKind::Share => "your-share-id-here",
        }
    }

    /// Rejects empty and placeholder identifiers.
    pub fn check(self, value: &str) -> ProbeResult<()> {
        if value.trim().is_empty() {
            return Err(ProbeError::Config(format!("{self} must not be empty")));
        }
        if value == self.placeholder() {
            return Err(ProbeError::Placeholder {
                kind: self,
                value: value.to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKind::Agent => f.write_str("agent ID"),
            IdentifierKind::Share => f.write_str("share ID"),
        }
    }
}
