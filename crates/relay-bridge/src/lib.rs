//! Invocation Bridge
//!
//! The invocation bridge dispatches inbound events from the host platform to
//! a named function on a remote serverless compute platform, authenticating
//! either with explicit token material from a secret store or through a
//! federated identity exchange.
//!
//! ## Architecture
//!
//! One invocation flows through four stages, each behind a trait seam:
//!
//! - **Credential resolution** ([`credentials::CredentialProvider`]):
//!   explicit-secret, federated-identity, or static material
//! - **Client construction** ([`platform::PlatformFactory`]): binds resolved
//!   credentials to a platform client, performing the token exchange in the
//!   federated case
//! - **Function lookup** ([`platform::RemotePlatform::lookup_function`]): a
//!   live resolution of the provisioned app/environment/function tuple
//! - **Dispatch** ([`dispatch::Dispatcher`]): synchronous (`remote`) or
//!   fire-and-forget (`spawn`) invocation, normalized into a
//!   [`relay_core::ResponseEnvelope`]
//!
//! ## Usage
//!
//! ```ignore
//! use relay_bridge::{credentials::*, InvocationBridge};
//! use relay_core::{BridgeConfig, CredentialSource, IntegrationPattern};
//!
//! let config = BridgeConfig::builder("demo-app", "main", "process", IntegrationPattern::Remote)
//!     .with_credential_source(CredentialSource::Secret("relay/demo".into()))
//!     .build()?;
//!
//! let bridge = InvocationBridge::builder(config)
//!     .with_secret_store(std::sync::Arc::new(HttpSecretStore::new("https://secrets.internal")))
//!     .build()?;
//!
//! let envelope = bridge.handle(serde_json::json!({"input": "test"})).await?;
//! ```

pub mod bridge;
pub mod client;
pub mod credentials;
pub mod dispatch;
pub mod error;
pub mod platform;

pub use bridge::{InvocationBridge, InvocationBridgeBuilder};
pub use client::{HttpPlatformFactory, PlatformClient, DEFAULT_API_BASE};
pub use credentials::{CredentialProvider, ResolvedCredentials};
pub use dispatch::Dispatcher;
pub use error::{BridgeError, Result};
pub use platform::{PlatformFactory, RemotePlatform};
