//! Federated credential provider
//!
//! In the federated trust path the execution environment carries a signed
//! identity token (projected into a file by the host platform). The provider
//! only reads that token; exchanging it for short-lived platform credentials
//! is the client factory's job.

use std::env;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::credentials::{CredentialProvider, ResolvedCredentials};
use crate::error::{BridgeError, Result};

/// Environment variable naming the projected identity-token file
pub const IDENTITY_TOKEN_FILE_VAR: &str = "RELAY_IDENTITY_TOKEN_FILE";

/// Credential provider backed by the ambient federated identity token
pub struct FederatedCredentialProvider {
    token_path: Option<PathBuf>,
}

impl FederatedCredentialProvider {
    /// Create a provider reading the identity token from the given path
    pub fn new(token_path: impl AsRef<Path>) -> Self {
        Self {
            token_path: Some(token_path.as_ref().to_path_buf()),
        }
    }

    /// Create a provider from the environment's projected token file, if any
    pub fn from_env() -> Self {
        Self {
            token_path: env::var(IDENTITY_TOKEN_FILE_VAR).ok().map(PathBuf::from),
        }
    }
}

#[async_trait]
impl CredentialProvider for FederatedCredentialProvider {
    async fn resolve(&self) -> Result<ResolvedCredentials> {
        let path = self.token_path.as_ref().ok_or_else(|| {
            BridgeError::CredentialUnavailable(format!(
                "no identity token file configured ({} unset)",
                IDENTITY_TOKEN_FILE_VAR
            ))
        })?;

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            BridgeError::CredentialUnavailable(format!(
                "identity token unreadable at {}: {}",
                path.display(),
                e
            ))
        })?;

        let identity_token = raw.trim().to_string();
        if identity_token.is_empty() {
            return Err(BridgeError::CredentialUnavailable(format!(
                "identity token file {} is empty",
                path.display()
            )));
        }

        debug!(path = %path.display(), "Read ambient identity token");

        Ok(ResolvedCredentials::Federated { identity_token })
    }

    fn description(&self) -> &str {
        "federated-identity credential provider"
    }
}
