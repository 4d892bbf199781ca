//! Invocation dispatcher
//!
//! Takes a resolved function handle and an inbound event, and performs the
//! invocation under the instance's integration pattern. The dispatcher never
//! retries: a failure propagates to the caller, and retry policy belongs to
//! the caller or the platform's own queueing.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{BridgeError, Result};
use crate::platform::RemotePlatform;
use relay_core::{FunctionHandle, IntegrationPattern, InvocationRequest, ResponseEnvelope};

/// Dispatches invocations under one integration pattern
pub struct Dispatcher {
    pattern: IntegrationPattern,
    params: Value,
}

impl Dispatcher {
    /// Create a dispatcher for a validated pattern and static parameters
    pub fn new(pattern: IntegrationPattern, params: Value) -> Self {
        Self { pattern, params }
    }

    /// Create a dispatcher from a raw pattern string
    ///
    /// Anything outside the supported variants fails with
    /// `UnsupportedIntegrationPattern` here, before any network call can be
    /// attempted.
    pub fn from_raw(pattern: &str, params: Value) -> Result<Self> {
        let pattern = pattern
            .parse::<IntegrationPattern>()
            .map_err(BridgeError::UnsupportedIntegrationPattern)?;
        Ok(Self::new(pattern, params))
    }

    /// The pattern this dispatcher was built with
    pub fn pattern(&self) -> IntegrationPattern {
        self.pattern
    }

    /// Invoke the function behind `handle` with the inbound event
    ///
    /// The remote function receives `[event, params]` positionally. For the
    /// `remote` pattern an optional deadline bounds the synchronous call;
    /// `spawn` returns as soon as the platform accepts and ignores the
    /// deadline.
    pub async fn dispatch(
        &self,
        platform: &dyn RemotePlatform,
        handle: &FunctionHandle,
        event: Value,
        deadline: Option<Duration>,
    ) -> Result<ResponseEnvelope> {
        info!(
            function = %handle.function_name,
            pattern = %self.pattern,
            event = %event,
            params = %self.params,
            "Dispatching invocation"
        );

        let args = InvocationRequest::new(event, self.params.clone()).into_args();

        match self.pattern {
            IntegrationPattern::Remote => {
                let call = platform.invoke(handle, args);
                let result = match deadline {
                    Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                        BridgeError::RemoteInvocationFailed(format!(
                            "deadline of {:?} exceeded",
                            limit
                        ))
                    })??,
                    None => call.await?,
                };
                debug!(function = %handle.function_name, "Remote invocation completed");
                Ok(ResponseEnvelope::remote(result))
            }
            IntegrationPattern::Spawn => {
                let call = platform.spawn(handle, args).await?;
                info!(
                    function = %handle.function_name,
                    function_call_id = %call.function_call_id,
                    "Spawned remote call"
                );
                Ok(ResponseEnvelope::spawned(&call))
            }
        }
    }
}
