//! HTTP remote-platform client
//!
//! Binds resolved credentials to a reqwest-backed client. Explicit token
//! material is attached to every request; a federated identity token is
//! exchanged once, at construction, for a short-lived access token.
//!
//! Status mapping follows the bridge's error taxonomy: 404 on lookup is
//! `FunctionNotFound`, credential rejection (401/403) anywhere is
//! `ClientInitializationFailed` so the bridge drops its cached client, and
//! remaining lookup failures are the retryable `LocatorUnavailable`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::credentials::ResolvedCredentials;
use crate::error::{BridgeError, Result};
use crate::platform::{PlatformFactory, RemotePlatform};
use relay_core::{CallHandle, FunctionHandle};

/// Default remote platform API base URL
pub const DEFAULT_API_BASE: &str = "https://api.relay.dev";

/// How the client authenticates against the platform
enum AuthMode {
    /// Long-lived token id/secret pair, attached per request
    Token { token_id: String, token_secret: String },
    /// Short-lived access token from the federated exchange
    Exchanged {
        access_token: String,
        expires_at: Option<DateTime<Utc>>,
    },
}

/// Token-exchange response from the platform's identity endpoint
#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    function_id: String,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    result: Value,
}

#[derive(Debug, Deserialize)]
struct SpawnResponse {
    function_call_id: String,
}

fn credential_rejected(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

/// Read a response body for error context without failing the error path
async fn body_context(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_else(|_| "<unreadable body>".into())
}

/// Remote-platform client bound to resolved credentials
pub struct PlatformClient {
    base_url: String,
    auth: AuthMode,
    http_client: reqwest::Client,
}

impl PlatformClient {
    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        match &self.auth {
            AuthMode::Token {
                token_id,
                token_secret,
            } => Ok(request
                .header("x-token-id", token_id)
                .header("x-token-secret", token_secret)),
            AuthMode::Exchanged {
                access_token,
                expires_at,
            } => {
                // An expired exchange token must force re-resolution rather
                // than produce a confusing 401 downstream.
                if let Some(expires_at) = expires_at {
                    if *expires_at < Utc::now() {
                        return Err(BridgeError::ClientInitializationFailed(
                            "exchanged access token expired".into(),
                        ));
                    }
                }
                Ok(request.bearer_auth(access_token))
            }
        }
    }
}

#[async_trait]
impl RemotePlatform for PlatformClient {
    async fn lookup_function(
        &self,
        app_name: &str,
        environment: &str,
        function_name: &str,
    ) -> Result<FunctionHandle> {
        let url = format!(
            "{}/v1/apps/{}/environments/{}/functions/{}",
            self.base_url, app_name, environment, function_name
        );
        debug!(app = %app_name, environment = %environment, function = %function_name, "Looking up function");

        let request = self.authorize(self.http_client.get(&url))?;
        let response = request
            .send()
            .await
            .map_err(|e| BridgeError::LocatorUnavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BridgeError::FunctionNotFound {
                app: app_name.to_string(),
                environment: environment.to_string(),
                function: function_name.to_string(),
            });
        }
        if credential_rejected(status) {
            return Err(BridgeError::ClientInitializationFailed(format!(
                "platform rejected credentials during lookup: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(BridgeError::LocatorUnavailable(format!(
                "control plane returned {}: {}",
                status,
                body_context(response).await
            )));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::LocatorUnavailable(format!("malformed lookup response: {}", e)))?;

        Ok(FunctionHandle {
            app_name: app_name.to_string(),
            environment: environment.to_string(),
            function_name: function_name.to_string(),
            function_id: lookup.function_id,
        })
    }

    async fn invoke(&self, handle: &FunctionHandle, args: Vec<Value>) -> Result<Value> {
        let url = format!("{}/v1/functions/{}/invoke", self.base_url, handle.function_id);

        let request = self.authorize(self.http_client.post(&url))?;
        let response = request
            .json(&serde_json::json!({ "args": args }))
            .send()
            .await
            .map_err(|e| BridgeError::RemoteInvocationFailed(e.to_string()))?;

        let status = response.status();
        if credential_rejected(status) {
            return Err(BridgeError::ClientInitializationFailed(format!(
                "platform rejected credentials during invoke: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(BridgeError::RemoteInvocationFailed(format!(
                "function '{}' failed with {}: {}",
                handle.function_name,
                status,
                body_context(response).await
            )));
        }

        let invoke: InvokeResponse = response.json().await.map_err(|e| {
            BridgeError::RemoteInvocationFailed(format!("malformed invoke response: {}", e))
        })?;

        Ok(invoke.result)
    }

    async fn spawn(&self, handle: &FunctionHandle, args: Vec<Value>) -> Result<CallHandle> {
        let url = format!("{}/v1/functions/{}/spawn", self.base_url, handle.function_id);

        let request = self.authorize(self.http_client.post(&url))?;
        let response = request
            .json(&serde_json::json!({ "args": args }))
            .send()
            .await
            .map_err(|e| BridgeError::RemoteInvocationFailed(e.to_string()))?;

        let status = response.status();
        if credential_rejected(status) {
            return Err(BridgeError::ClientInitializationFailed(format!(
                "platform rejected credentials during spawn: {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(BridgeError::RemoteInvocationFailed(format!(
                "spawn of '{}' rejected with {}: {}",
                handle.function_name,
                status,
                body_context(response).await
            )));
        }

        let spawn: SpawnResponse = response.json().await.map_err(|e| {
            BridgeError::RemoteInvocationFailed(format!("malformed spawn response: {}", e))
        })?;

        Ok(CallHandle::new(spawn.function_call_id))
    }

    fn description(&self) -> &str {
        "HTTP platform client"
    }
}

/// Factory building [`PlatformClient`] instances from resolved credentials
pub struct HttpPlatformFactory {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpPlatformFactory {
    /// Create a factory against the given API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Exchange a federated identity token for a short-lived access token
    async fn exchange_identity_token(&self, identity_token: &str) -> Result<AuthMode> {
        let url = format!("{}/v1/identity/exchange", self.base_url);
        debug!("Exchanging federated identity token");

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "identity_token": identity_token }))
            .send()
            .await
            .map_err(|e| {
                BridgeError::ClientInitializationFailed(format!("token exchange failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            // Trust policy mismatch or an expired token surface here.
            let body = body_context(response).await;
            warn!(status = %status, "Identity token exchange rejected");
            return Err(BridgeError::ClientInitializationFailed(format!(
                "token exchange rejected with {}: {}",
                status, body
            )));
        }

        let exchange: ExchangeResponse = response.json().await.map_err(|e| {
            BridgeError::ClientInitializationFailed(format!("malformed exchange response: {}", e))
        })?;

        Ok(AuthMode::Exchanged {
            access_token: exchange.access_token,
            expires_at: exchange.expires_in.map(|secs| Utc::now() + Duration::seconds(secs)),
        })
    }
}

impl Default for HttpPlatformFactory {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

#[async_trait]
impl PlatformFactory for HttpPlatformFactory {
    async fn connect(&self, credentials: ResolvedCredentials) -> Result<Arc<dyn RemotePlatform>> {
        let auth = match credentials {
            ResolvedCredentials::Explicit(material) => {
                if material.is_empty() {
                    return Err(BridgeError::ClientInitializationFailed(
                        "credential material has empty token id or secret".into(),
                    ));
                }
                AuthMode::Token {
                    token_id: material.token_id,
                    token_secret: material.token_secret,
                }
            }
            ResolvedCredentials::Federated { identity_token } => {
                self.exchange_identity_token(&identity_token).await?
            }
        };

        Ok(Arc::new(PlatformClient {
            base_url: self.base_url.clone(),
            auth,
            http_client: self.http_client.clone(),
        }))
    }

    fn description(&self) -> &str {
        "HTTP platform factory"
    }
}
