//! The two probe flows: session create/update and shared message.
//!
//! Requests within a flow are strictly sequential. A failure ends the flow
//! and is returned to the caller; nothing is retried.

use crate::client::ProxyClient;
use crate::report::Reporter;
use proxyprobe_core::{
    CreateSessionRequest, IdentifierKind, ProbeResult, ProxyResponse, SharedMessageRequest,
    UpdateSessionRequest,
};
use serde_json::Value;
use std::io::Write;
use tracing::{info, warn};
use uuid::Uuid;

/// One request/response pair.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The JSON body that was sent.
    pub payload: Value,
    /// What the proxy answered.
    pub response: ProxyResponse,
}

/// Outcome of [`run_session_probe`].
#[derive(Debug, Clone)]
pub struct SessionProbeReport {
    /// The create-session exchange.
    pub create: Exchange,
    /// The follow-up update, present only when the create call succeeded.
    pub update: Option<Exchange>,
}

/// Outcome of [`run_shared_message_probe`].
#[derive(Debug, Clone)]
pub struct SharedProbeReport {
    /// The locally generated session ID.
    pub session_id: String,
    /// The shared-message exchange.
    pub exchange: Exchange,
}

/// Creates a session for the configured agent and, if the proxy reports
/// success with a session ID, posts `message` into it.
pub async fn run_session_probe<W: Write>(
    client: &ProxyClient,
    message: &str,
    reporter: &mut Reporter<W>,
) -> ProbeResult<SessionProbeReport> {
    let agent_id = client.config().identifier.as_str();
    IdentifierKind::Agent.check(agent_id)?;

    let timestamp = chrono::Utc::now().timestamp_millis();
    let create_payload = serde_json::to_value(CreateSessionRequest::new(agent_id, timestamp))?;

    reporter.section("Test 1: Create New Session")?;
    reporter.payload(Some(client.endpoint()), &create_payload)?;
    reporter.sending()?;

    let response = client.create_session(agent_id, timestamp).await?;
    reporter.response(&response, true)?;

    let create = Exchange {
        payload: create_payload,
        response,
    };

    let reply = create.response.reply();
    let Some(session_id) = reply.continuation() else {
        warn!(
            status = create.response.status,
            error = reply.error.as_deref().unwrap_or(""),
            "Session was not created; skipping update"
        );
        return Ok(SessionProbeReport {
            create,
            update: None,
        });
    };
    info!(session_id, "Session created");

    let update_payload =
        serde_json::to_value(UpdateSessionRequest::new(agent_id, session_id, message))?;
    reporter.section("Test 2: Update Session")?;
    reporter.payload(None, &update_payload)?;

    let response = client.update_session(agent_id, session_id, message).await?;
    reporter.response(&response, false)?;

    Ok(SessionProbeReport {
        create,
        update: Some(Exchange {
            payload: update_payload,
            response,
        }),
    })
}

/// Sends `message` for the configured share ID under a new random session ID.
pub async fn run_shared_message_probe<W: Write>(
    client: &ProxyClient,
    message: &str,
    reporter: &mut Reporter<W>,
) -> ProbeResult<SharedProbeReport> {
    let share_id = client.config().identifier.as_str();
    IdentifierKind::Share.check(share_id)?;

    let session_id = Uuid::new_v4().to_string();
    let payload = serde_json::to_value(SharedMessageRequest::new(&session_id, share_id, message))?;

    reporter.section("Shared Agent Message")?;
    reporter.payload(Some(client.endpoint()), &payload)?;
    reporter.sending()?;

    let response = client
        .send_shared_message(&session_id, share_id, message)
        .await?;
    reporter.response(&response, true)?;
    reporter.debug(&response.reply())?;

    Ok(SharedProbeReport {
        session_id,
        exchange: Exchange { payload, response },
    })
}
