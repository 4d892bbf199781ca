//! Invocation bridge
//!
//! Ties the stages of one invocation together: credential resolution, client
//! construction, function lookup, and dispatch. Each event is handled to
//! completion; a failure at any stage terminates the invocation and surfaces
//! its error kind to the caller unchanged.
//!
//! The bound client (and the credential material behind it) is cached across
//! sequential invocations and treated as read-only once resolved. A
//! credential rejection from the platform drops the cache so the next
//! invocation re-resolves instead of failing forever on stale material.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::credentials::{
    CredentialProvider, FederatedCredentialProvider, SecretCredentialProvider, SecretStore,
};
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::platform::{PlatformFactory, RemotePlatform};
use relay_core::{BridgeConfig, CredentialSource, ResponseEnvelope};

/// The invocation bridge for one provisioned app/environment/function tuple
pub struct InvocationBridge {
    config: BridgeConfig,
    credentials: Arc<dyn CredentialProvider>,
    factory: Arc<dyn PlatformFactory>,
    dispatcher: Dispatcher,
    client: RwLock<Option<Arc<dyn RemotePlatform>>>,
}

impl InvocationBridge {
    /// Start building a bridge for the given configuration
    pub fn builder(config: BridgeConfig) -> InvocationBridgeBuilder {
        InvocationBridgeBuilder {
            config,
            credentials: None,
            factory: None,
            secret_store: None,
        }
    }

    /// The configuration this bridge was built with
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Handle one inbound event, bounded by the configured invoke timeout
    pub async fn handle(&self, event: Value) -> Result<ResponseEnvelope> {
        self.handle_with_deadline(event, Some(self.config.invoke_timeout))
            .await
    }

    /// Handle one inbound event with a caller-provided deadline
    ///
    /// `None` disables the bound entirely; the synchronous pattern then
    /// blocks until the remote function completes.
    pub async fn handle_with_deadline(
        &self,
        event: Value,
        deadline: Option<Duration>,
    ) -> Result<ResponseEnvelope> {
        let invocation_id = Uuid::new_v4();
        debug!(%invocation_id, function = %self.config.function_name, "Handling invocation");

        let outcome = self.run(invocation_id, event, deadline).await;

        // Stale or revoked credentials: drop the cached client so the next
        // invocation re-resolves.
        if let Err(BridgeError::ClientInitializationFailed(reason)) = &outcome {
            warn!(%invocation_id, reason = %reason, "Dropping cached remote client");
            *self.client.write().await = None;
        }

        outcome
    }

    async fn run(
        &self,
        invocation_id: Uuid,
        event: Value,
        deadline: Option<Duration>,
    ) -> Result<ResponseEnvelope> {
        let platform = self.platform(invocation_id).await?;

        debug!(%invocation_id, "Locating function");
        let handle = platform
            .lookup_function(
                &self.config.app_name,
                &self.config.environment,
                &self.config.function_name,
            )
            .await?;

        self.dispatcher
            .dispatch(platform.as_ref(), &handle, event, deadline)
            .await
    }

    /// Get the bound platform client, connecting on first use
    async fn platform(&self, invocation_id: Uuid) -> Result<Arc<dyn RemotePlatform>> {
        if let Some(platform) = self.client.read().await.clone() {
            return Ok(platform);
        }

        let mut guard = self.client.write().await;
        // Another invocation may have connected while we waited.
        if let Some(platform) = guard.clone() {
            return Ok(platform);
        }

        debug!(%invocation_id, provider = %self.credentials.description(), "Resolving credentials");
        let credentials = self.credentials.resolve().await?;

        debug!(%invocation_id, factory = %self.factory.description(), "Building remote client");
        let platform = self.factory.connect(credentials).await?;

        *guard = Some(platform.clone());
        Ok(platform)
    }
}

/// Builder for [`InvocationBridge`]
pub struct InvocationBridgeBuilder {
    config: BridgeConfig,
    credentials: Option<Arc<dyn CredentialProvider>>,
    factory: Option<Arc<dyn PlatformFactory>>,
    secret_store: Option<Arc<dyn SecretStore>>,
}

impl InvocationBridgeBuilder {
    /// Use a specific credential provider instead of deriving one from the
    /// configured credential source
    pub fn with_credential_provider<P: CredentialProvider + 'static>(mut self, provider: P) -> Self {
        self.credentials = Some(Arc::new(provider));
        self
    }

    /// Use a specific platform factory
    pub fn with_platform_factory<F: PlatformFactory + 'static>(mut self, factory: F) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    /// Secret store consulted when the configuration selects explicit-secret
    /// mode
    pub fn with_secret_store(mut self, store: Arc<dyn SecretStore>) -> Self {
        self.secret_store = Some(store);
        self
    }

    /// Build the bridge
    ///
    /// When no credential provider was supplied, one is derived from the
    /// configuration: explicit-secret mode requires a secret store; federated
    /// mode reads the ambient identity token configured in the environment.
    pub fn build(self) -> Result<InvocationBridge> {
        let factory: Arc<dyn PlatformFactory> = match self.factory {
            Some(factory) => factory,
            None => Arc::new(crate::client::HttpPlatformFactory::default()),
        };

        let credentials: Arc<dyn CredentialProvider> = match self.credentials {
            Some(provider) => provider,
            None => match &self.config.credential_source {
                CredentialSource::Secret(reference) => {
                    let store = self.secret_store.ok_or_else(|| {
                        BridgeError::CredentialUnavailable(
                            "explicit-secret mode requires a secret store".into(),
                        )
                    })?;
                    Arc::new(SecretCredentialProvider::new(store, reference.clone()))
                }
                CredentialSource::Federated => Arc::new(FederatedCredentialProvider::from_env()),
            },
        };

        let dispatcher = Dispatcher::new(self.config.integration_pattern, self.config.params.clone());

        Ok(InvocationBridge {
            config: self.config,
            credentials,
            factory,
            dispatcher,
            client: RwLock::new(None),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::IntegrationPattern;

    fn config(pattern: IntegrationPattern) -> BridgeConfig {
        BridgeConfig::builder("demo-app", "main", "process", pattern)
            .build()
            .unwrap()
    }

    #[test]
    fn test_secret_mode_requires_store() {
        let config = BridgeConfig::builder("demo-app", "main", "process", IntegrationPattern::Remote)
            .with_credential_source(CredentialSource::Secret("relay/demo".into()))
            .build()
            .unwrap();

        let result = InvocationBridge::builder(config).build();
        assert!(matches!(result, Err(BridgeError::CredentialUnavailable(_))));
    }

    #[test]
    fn test_federated_mode_builds_without_store() {
        let bridge = InvocationBridge::builder(config(IntegrationPattern::Spawn))
            .build()
            .unwrap();
        assert_eq!(bridge.config().function_identifier(), "process_spawn");
    }
}
