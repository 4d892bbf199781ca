//! Credential resolution
//!
//! The bridge obtains remote-platform credentials through a pluggable
//! provider abstraction, selected once at construction time:
//!
//! - **Explicit secret**: fetch a stored secret record by reference and parse
//!   it into token material
//! - **Federated**: present the ambient identity token; the actual exchange
//!   for short-lived credentials happens inside the client factory
//! - **Static**: fixed material, for tests and local runs
//!
//! Providers return credentials by value. Nothing is written into shared
//! process state, so concurrent invocations in one process cannot observe
//! each other's resolution.

pub mod federated;
pub mod secret;
pub mod statik;

pub use federated::FederatedCredentialProvider;
pub use secret::{HttpSecretStore, InMemorySecretStore, SecretCredentialProvider, SecretStore};
pub use statik::StaticCredentialProvider;

use async_trait::async_trait;

use crate::error::Result;
use relay_core::CredentialMaterial;

/// Credentials resolved for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedCredentials {
    /// Long-lived token material from the secret store
    Explicit(CredentialMaterial),
    /// A signed ambient identity token, to be exchanged by the client
    /// factory for short-lived platform credentials
    Federated {
        /// The raw identity token presented to the platform's identity
        /// provider
        identity_token: String,
    },
}

/// Trait for credential providers
///
/// Each provider knows one way of producing credentials for the remote
/// platform. Resolution is idempotent: resolving twice against the same
/// source yields identical values.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Resolve credentials for the current invocation
    async fn resolve(&self) -> Result<ResolvedCredentials>;

    /// Get a description of this provider (for logging)
    fn description(&self) -> &str {
        "credential provider"
    }
}
