use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a proxy response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was not valid JSON; kept verbatim.
    Text(String),
}

impl ResponseBody {
    /// Classifies raw response text, falling back to [`ResponseBody::Text`].
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    /// The parsed JSON, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Whether the body could not be parsed as JSON.
    pub fn is_text(&self) -> bool {
        matches!(self, ResponseBody::Text(_))
    }
}

/// A captured HTTP response from the proxy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in the order received.
    pub headers: Vec<(String, String)>,
    /// Parsed or raw body.
    pub body: ResponseBody,
}

impl ProxyResponse {
    /// Builds a response from its parts, classifying the body text.
    pub fn new(status: u16, headers: Vec<(String, String)>, body_text: String) -> Self {
        Self {
            status,
            headers,
            body: ResponseBody::from_text(body_text),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup; returns the first match.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Typed view over the body. Empty when the body is not a JSON object.
    pub fn reply(&self) -> ProxyReply {
        self.body
            .as_json()
            .map(ProxyReply::from_value)
            .unwrap_or_default()
    }
}

/// Diagnostic block some proxy deployments attach under `debug`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DebugInfo {
    /// `debug.env`: environment visible to the function.
    pub env: Map<String, Value>,
    /// `debug.sql_query`: the query the function ran.
    pub sql_query: Option<String>,
}

impl DebugInfo {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let env = obj
            .get("env")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let sql_query = obj
            .get("sql_query")
            .and_then(Value::as_str)
            .map(str::to_string);
        if env.is_empty() && sql_query.is_none() {
            return None;
        }
        Some(Self { env, sql_query })
    }
}

/// Lenient typed view of a proxy JSON reply.
///
/// Fields with an unexpected JSON type are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProxyReply {
    /// `success`; false when missing.
    pub success: bool,
    /// `sessionId` returned by a create call.
    pub session_id: Option<String>,
    /// `message`, e.g. `"Session updated"`.
    pub message: Option<String>,
    /// `error` text of a failed call.
    pub error: Option<String>,
    /// `session`: the created session record.
    pub session: Option<Value>,
    /// `debug` block.
    pub debug: Option<DebugInfo>,
}

impl ProxyReply {
    /// Reads the known fields out of a JSON value.
    pub fn from_value(value: &Value) -> Self {
        let string_field = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            success: value
                .get("success")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            session_id: string_field("sessionId"),
            message: string_field("message"),
            error: string_field("error"),
            session: value.get("session").filter(|s| s.is_object()).cloned(),
            debug: value.get("debug").and_then(DebugInfo::from_value),
        }
    }

    /// Session ID to continue with: present only when the call succeeded
    /// and returned a non-empty `sessionId`.
    pub fn continuation(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.session_id.as_deref().filter(|id| !id.is_empty())
    }
}
