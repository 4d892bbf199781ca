//! Core types for the invocation bridge

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How a bridge instance invokes its remote function
///
/// Exactly one pattern is selected per instance at provisioning time; it is
/// not selectable per-invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationPattern {
    /// Synchronous call; blocks until the remote function completes
    Remote,
    /// Fire-and-forget; returns once the remote platform accepts the call
    Spawn,
}

impl std::fmt::Display for IntegrationPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationPattern::Remote => write!(f, "remote"),
            IntegrationPattern::Spawn => write!(f, "spawn"),
        }
    }
}

impl std::str::FromStr for IntegrationPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(IntegrationPattern::Remote),
            "spawn" => Ok(IntegrationPattern::Spawn),
            other => Err(other.to_string()),
        }
    }
}

/// Remote-platform API credentials: a token identifier and token secret
///
/// Held only in process memory for the duration of one invocation; never
/// persisted by the bridge itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialMaterial {
    /// Token identifier
    #[serde(rename = "TOKEN_ID")]
    pub token_id: String,

    /// Token secret
    #[serde(rename = "TOKEN_SECRET")]
    pub token_secret: String,
}

impl CredentialMaterial {
    /// Create credential material from a token id/secret pair
    pub fn new(token_id: impl Into<String>, token_secret: impl Into<String>) -> Self {
        Self {
            token_id: token_id.into(),
            token_secret: token_secret.into(),
        }
    }

    /// Whether either half of the pair is structurally empty
    pub fn is_empty(&self) -> bool {
        self.token_id.is_empty() || self.token_secret.is_empty()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for CredentialMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialMaterial")
            .field("token_id", &self.token_id)
            .field("token_secret", &"<redacted>")
            .finish()
    }
}

/// A resolved handle to a specific remote function
///
/// Produced by the function locator on every invocation. The lookup is live:
/// a handle is never reused across invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionHandle {
    /// The remote application namespace
    pub app_name: String,
    /// The deployment environment within the app
    pub environment: String,
    /// The function name within the app/environment
    pub function_name: String,
    /// Platform-assigned function identifier
    pub function_id: String,
}

/// Opaque handle to a fire-and-forget call
///
/// Retrieval of the eventual result happens out of band; the bridge only
/// surfaces the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHandle {
    /// Platform-assigned identifier for the spawned call
    #[serde(rename = "functionCallId")]
    pub function_call_id: String,
}

impl CallHandle {
    /// Create a call handle from a platform-assigned identifier
    pub fn new(function_call_id: impl Into<String>) -> Self {
        Self {
            function_call_id: function_call_id.into(),
        }
    }
}

/// Invocation outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationStatus {
    /// The invocation completed (or was accepted, for `spawn`)
    Success,
}

/// The caller-facing result of one invocation
///
/// For the `remote` pattern the response is the remote function's return
/// value verbatim; for `spawn` it is `{"functionCallId": <id>}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Outcome status
    pub status: InvocationStatus,
    /// Response payload
    pub response: Value,
}

impl ResponseEnvelope {
    /// Envelope for a completed synchronous invocation
    pub fn remote(result: Value) -> Self {
        Self {
            status: InvocationStatus::Success,
            response: result,
        }
    }

    /// Envelope for an accepted fire-and-forget invocation
    pub fn spawned(call: &CallHandle) -> Self {
        Self {
            status: InvocationStatus::Success,
            response: serde_json::json!({ "functionCallId": call.function_call_id }),
        }
    }
}

/// One inbound event plus the instance's static parameters
///
/// The two are combined positionally: the remote function receives
/// `[event, params]` as its argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationRequest {
    /// The inbound event payload
    pub event: Value,
    /// Static parameters replayed on every invocation
    pub params: Value,
}

impl InvocationRequest {
    /// Combine an event with static parameters
    pub fn new(event: Value, params: Value) -> Self {
        Self { event, params }
    }

    /// Lower to the two-element positional argument list
    pub fn into_args(self) -> Vec<Value> {
        vec![self.event, self.params]
    }
}
