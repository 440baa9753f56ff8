use serde::{Deserialize, Serialize};

/// Body of the session-creation request.
///
/// The proxy derives the new session ID from these two fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Agent the session belongs to.
    pub agent_id: String,
    /// Client clock in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CreateSessionRequest {
    /// Creates a payload for the given agent and timestamp.
    pub fn new(agent_id: impl Into<String>, timestamp: i64) -> Self {
        Self {
            agent_id: agent_id.into(),
            timestamp,
        }
    }
}

/// Body of the request that posts a message into an existing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    /// Agent the session belongs to.
    pub agent_id: String,
    /// Session ID returned by a prior create call.
    pub session_id: String,
    /// Message text.
    pub message: String,
}

impl UpdateSessionRequest {
    /// Creates an update payload.
    pub fn new(
        agent_id: impl Into<String>,
        session_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            session_id: session_id.into(),
            message: message.into(),
        }
    }
}

/// Body of a message sent through a shared agent link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedMessageRequest {
    /// Locally generated session ID.
    pub session_id: String,
    /// Share ID of the shared agent.
    pub share_id: String,
    /// Message text.
    pub message: String,
}

impl SharedMessageRequest {
    /// Creates a shared-message payload.
    pub fn new(
        session_id: impl Into<String>,
        share_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            share_id: share_id.into(),
            message: message.into(),
        }
    }
}
