//! Explicit-secret credential provider
//!
//! Fetches a stored secret record by reference from the external secret
//! store and parses it into token material. Any fetch or parse failure is a
//! `CredentialUnavailable` condition; no client is constructed from a
//! half-resolved secret.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::{CredentialProvider, ResolvedCredentials};
use crate::error::{BridgeError, Result};
use relay_core::CredentialMaterial;

/// Backend trait for the external secret-storage service
///
/// Implementations return the raw secret string for a reference; parsing is
/// the provider's job.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch the raw secret record by reference
    async fn fetch(&self, reference: &str) -> Result<String>;

    /// Get a description of this store
    fn description(&self) -> &str {
        "secret store"
    }
}

/// In-memory secret store for testing
pub struct InMemorySecretStore {
    secrets: RwLock<HashMap<String, String>>,
}

impl InMemorySecretStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    /// Store a secret record under a reference
    pub fn put(&self, reference: impl Into<String>, value: impl Into<String>) {
        let mut secrets = self.secrets.write().unwrap();
        secrets.insert(reference.into(), value.into());
    }

    /// Remove a secret record
    pub fn remove(&self, reference: &str) -> bool {
        let mut secrets = self.secrets.write().unwrap();
        secrets.remove(reference).is_some()
    }
}

impl Default for InMemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn fetch(&self, reference: &str) -> Result<String> {
        let secrets = self.secrets.read().unwrap();
        secrets.get(reference).cloned().ok_or_else(|| {
            BridgeError::CredentialUnavailable(format!("secret '{}' not found", reference))
        })
    }

    fn description(&self) -> &str {
        "in-memory secret store"
    }
}

/// Secret store backed by the external secret service's HTTP API
pub struct HttpSecretStore {
    endpoint: String,
    http_client: reqwest::Client,
}

impl HttpSecretStore {
    /// Create a store against the given service endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SecretStore for HttpSecretStore {
    async fn fetch(&self, reference: &str) -> Result<String> {
        let url = format!("{}/v1/secrets/{}", self.endpoint, reference);
        debug!(reference = %reference, "Fetching secret record");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| BridgeError::CredentialUnavailable(format!("secret store unreachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(BridgeError::CredentialUnavailable(format!(
                "secret store returned {} for '{}'",
                response.status(),
                reference
            )));
        }

        response
            .text()
            .await
            .map_err(|e| BridgeError::CredentialUnavailable(format!("secret read failed: {}", e)))
    }

    fn description(&self) -> &str {
        "HTTP secret store"
    }
}

/// Credential provider that resolves explicit token material from a stored
/// secret
pub struct SecretCredentialProvider {
    store: Arc<dyn SecretStore>,
    reference: String,
}

impl SecretCredentialProvider {
    /// Create a provider for one secret reference
    pub fn new(store: Arc<dyn SecretStore>, reference: impl Into<String>) -> Self {
        Self {
            store,
            reference: reference.into(),
        }
    }
}

#[async_trait]
impl CredentialProvider for SecretCredentialProvider {
    async fn resolve(&self) -> Result<ResolvedCredentials> {
        let raw = self.store.fetch(&self.reference).await?;

        let material: CredentialMaterial = serde_json::from_str(&raw).map_err(|e| {
            BridgeError::CredentialUnavailable(format!(
                "malformed secret record '{}': {}",
                self.reference, e
            ))
        })?;

        if material.is_empty() {
            return Err(BridgeError::CredentialUnavailable(format!(
                "secret record '{}' has empty token material",
                self.reference
            )));
        }

        debug!(
            reference = %self.reference,
            token_id = %material.token_id,
            "Resolved explicit credential material"
        );

        Ok(ResolvedCredentials::Explicit(material))
    }

    fn description(&self) -> &str {
        "explicit-secret credential provider"
    }
}
