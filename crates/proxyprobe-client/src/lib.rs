//! HTTP client and probe flows for the proxy edge function.
//!
//! [`ProxyClient`] performs single POSTs; [`probe`] chains them into the
//! session and shared-message flows and writes a transcript through a
//! [`Reporter`].

/// Single-request HTTP client for the proxy.
pub mod client;
/// Connection settings for one probe run.
pub mod config;
pub mod probe;
pub mod report;

pub use client::ProxyClient;
pub use config::ProxyConfig;
pub use probe::{
    run_session_probe, run_shared_message_probe, Exchange, SessionProbeReport, SharedProbeReport,
};
pub use report::Reporter;
