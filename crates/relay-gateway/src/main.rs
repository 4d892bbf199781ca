//! Relay Gateway Binary
//!
//! Runs the HTTP entry point for one provisioned invocation bridge.

use std::env;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use relay_bridge::client::{HttpPlatformFactory, DEFAULT_API_BASE};
use relay_bridge::credentials::HttpSecretStore;
use relay_bridge::InvocationBridge;
use relay_core::{BridgeConfig, CredentialSource};
use relay_gateway::{create_router, AppState};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("RELAY_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Instance configuration, read once
    let config = BridgeConfig::from_env().expect("Invalid bridge configuration");

    let port: u16 = env::var("RELAY_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()
        .expect("RELAY_PORT must be a valid port number");

    let api_base = env::var("RELAY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());

    info!(
        app = %config.app_name,
        environment = %config.environment,
        function = %config.function_name,
        pattern = %config.integration_pattern,
        identifier = %config.function_identifier(),
        "Starting relay gateway"
    );

    // Assemble the bridge
    let mut builder = InvocationBridge::builder(config.clone())
        .with_platform_factory(HttpPlatformFactory::new(api_base));

    if let CredentialSource::Secret(_) = &config.credential_source {
        let endpoint =
            env::var("RELAY_SECRET_STORE_URL").expect("RELAY_SECRET_STORE_URL must be set in explicit-secret mode");
        builder = builder.with_secret_store(Arc::new(HttpSecretStore::new(endpoint)));
    }

    let bridge = builder.build().expect("Failed to assemble invocation bridge");

    let state = Arc::new(AppState { bridge });
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "Relay gateway listening");

    axum::serve(listener, app).await.expect("Server error");
}
