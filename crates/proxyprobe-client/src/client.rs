use crate::config::ProxyConfig;
use proxyprobe_core::{
    CreateSessionRequest, ProbeError, ProbeResult, ProxyResponse, SharedMessageRequest,
    UpdateSessionRequest,
};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Client for the proxy edge function.
///
/// Every call is a single POST with no retries; the caller decides what to
/// do with the response.
pub struct ProxyClient {
    config: ProxyConfig,
    endpoint: String,
    http: reqwest::Client,
}

impl ProxyClient {
    /// Validates `config` and builds a client with reqwest's defaults.
    pub fn new(config: ProxyConfig) -> ProbeResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ProbeError::Unexpected(format!("Failed to create HTTP client: {e}")))?;
        Self::with_http(config, http)
    }

    /// Validates `config` and wraps an existing reqwest client.
    pub fn with_http(config: ProxyConfig, http: reqwest::Client) -> ProbeResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint();
        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    /// The resolved configuration.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Full proxy URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Asks the proxy to open a new session for `agent_id`.
    pub async fn create_session(
        &self,
        agent_id: &str,
        timestamp: i64,
    ) -> ProbeResult<ProxyResponse> {
        self.post(&CreateSessionRequest::new(agent_id, timestamp))
            .await
    }

    /// Posts `message` into an existing session.
    pub async fn update_session(
        &self,
        agent_id: &str,
        session_id: &str,
        message: &str,
    ) -> ProbeResult<ProxyResponse> {
        self.post(&UpdateSessionRequest::new(agent_id, session_id, message))
            .await
    }

    /// Sends `message` through a shared agent link.
    pub async fn send_shared_message(
        &self,
        session_id: &str,
        share_id: &str,
        message: &str,
    ) -> ProbeResult<ProxyResponse> {
        self.post(&SharedMessageRequest::new(session_id, share_id, message))
            .await
    }

    /// POSTs any JSON payload to the proxy and captures the response.
    ///
    /// Non-2xx statuses are returned as ordinary responses.
    pub async fn post<T: Serialize + ?Sized>(&self, payload: &T) -> ProbeResult<ProxyResponse> {
        let body = serde_json::to_vec(payload)?;
        debug!(bytes = body.len(), "Encoded proxy payload");
        info!(url = %self.endpoint, "POST proxy");

        let resp = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.config.token)
            .body(body)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = resp.status().as_u16();
        let headers: Vec<(String, String)> = resp
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let text = resp
            .text()
            .await
            .map_err(|e| ProbeError::Decode(format!("Failed to read response body: {e}")))?;

        let response = ProxyResponse::new(status, headers, text);
        info!(status, "Proxy responded");
        if response.body.is_text() {
            warn!(status, "Proxy returned a non-JSON body");
        }
        Ok(response)
    }
}

fn classify_send_error(err: reqwest::Error) -> ProbeError {
    if err.is_builder() {
        ProbeError::Config(format!("Invalid request: {err}"))
    } else {
        ProbeError::Network(err.to_string())
    }
}
