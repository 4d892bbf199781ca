//! Remote platform abstraction
//!
//! The bridge talks to the remote serverless platform through two seams: a
//! factory that binds resolved credentials to a client, and the client
//! itself, covering function lookup and the two invocation calls. The HTTP
//! implementations live in [`crate::client`]; tests substitute mocks.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::credentials::ResolvedCredentials;
use crate::error::Result;
use relay_core::{CallHandle, FunctionHandle};

/// Trait for remote-platform clients bound to resolved credentials
#[async_trait]
pub trait RemotePlatform: Send + Sync {
    /// Resolve a function handle by app, environment, and function name
    ///
    /// This is a live lookup against the platform's control plane; handles
    /// are not cached across invocations.
    async fn lookup_function(
        &self,
        app_name: &str,
        environment: &str,
        function_name: &str,
    ) -> Result<FunctionHandle>;

    /// Invoke synchronously, blocking until the remote function completes
    async fn invoke(&self, handle: &FunctionHandle, args: Vec<Value>) -> Result<Value>;

    /// Fire-and-forget: return once the platform accepts the call
    async fn spawn(&self, handle: &FunctionHandle, args: Vec<Value>) -> Result<CallHandle>;

    /// Get a description of this platform client (for logging)
    fn description(&self) -> &str {
        "remote platform"
    }
}

/// Trait for constructing a platform client from resolved credentials
///
/// Construction performs no network calls beyond what binding the
/// credentials requires (the token exchange, in the federated case).
#[async_trait]
pub trait PlatformFactory: Send + Sync {
    /// Bind credentials to a platform client
    async fn connect(&self, credentials: ResolvedCredentials) -> Result<Arc<dyn RemotePlatform>>;

    /// Get a description of this factory (for logging)
    fn description(&self) -> &str {
        "platform factory"
    }
}
