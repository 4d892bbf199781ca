//! Error types for the invocation bridge
//!
//! Every error kind is surfaced to the bridge's caller verbatim; no error is
//! recovered locally and no fallback path exists.

use thiserror::Error;

/// Result type for invocation bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur while handling one invocation
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Credential material could not be fetched or parsed
    #[error("Credential material unavailable: {0}")]
    CredentialUnavailable(String),

    /// The remote platform rejected the credential material, or the
    /// federated token exchange failed
    #[error("Remote client initialization failed: {0}")]
    ClientInitializationFailed(String),

    /// No remote function matches the configured tuple
    #[error("Function '{function}' not found in app '{app}', environment '{environment}'")]
    FunctionNotFound {
        app: String,
        environment: String,
        function: String,
    },

    /// Transient remote control-plane failure during function lookup
    #[error("Remote control plane unavailable during lookup: {0}")]
    LocatorUnavailable(String),

    /// The remote function raised, or the transport failed, during a
    /// synchronous call
    #[error("Remote invocation failed: {0}")]
    RemoteInvocationFailed(String),

    /// The configured integration pattern is not a supported variant
    #[error("Unsupported integration pattern: \"{0}\"")]
    UnsupportedIntegrationPattern(String),
}

impl BridgeError {
    /// Whether the caller may reasonably retry the invocation as-is
    ///
    /// Only transient control-plane unavailability qualifies; retry policy
    /// itself belongs to the caller, never to the bridge.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::LocatorUnavailable(_))
    }
}
