//! Static credential provider
//!
//! Fixed token material, for tests and local runs against a development
//! workspace.

use async_trait::async_trait;

use crate::credentials::{CredentialProvider, ResolvedCredentials};
use crate::error::Result;
use relay_core::CredentialMaterial;

/// Credential provider returning fixed material on every resolution
pub struct StaticCredentialProvider {
    material: CredentialMaterial,
}

impl StaticCredentialProvider {
    /// Create a provider for the given material
    pub fn new(material: CredentialMaterial) -> Self {
        Self { material }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn resolve(&self) -> Result<ResolvedCredentials> {
        Ok(ResolvedCredentials::Explicit(self.material.clone()))
    }

    fn description(&self) -> &str {
        "static credential provider"
    }
}
