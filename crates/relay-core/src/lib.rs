//! # Relay Core
//!
//! Core types for the relay invocation bridge: the data model shared by the
//! bridge runtime and the gateway, the instance configuration, and the
//! trust-binding material handed to the infrastructure-provisioning engine.
//!
//! ## Key Concepts
//!
//! - **Integration pattern**: the invocation semantics a bridge instance is
//!   provisioned with — synchronous (`remote`) or fire-and-forget (`spawn`)
//! - **Credential material**: the token id/secret pair used to authenticate
//!   against the remote platform when no federated trust path exists
//! - **Trust binding**: the federated-identity subject scope pinning an
//!   execution identity to exactly one workspace/environment/app/function
//! - **Response envelope**: the caller-facing result of one invocation

pub mod config;
pub mod error;
pub mod trust;
pub mod types;

pub use config::{BridgeConfig, BridgeConfigBuilder, CredentialSource};
pub use error::{ConfigError, Result};
pub use trust::TrustBinding;
pub use types::{
    CallHandle, CredentialMaterial, FunctionHandle, IntegrationPattern, InvocationRequest,
    InvocationStatus, ResponseEnvelope,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
