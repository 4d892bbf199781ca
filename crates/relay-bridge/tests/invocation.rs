//! Integration tests for the invocation bridge
//!
//! These drive full invocations through a mock platform:
//! - envelope shapes for both integration patterns
//! - failure ordering (no client, lookup, or dispatch after an earlier stage
//!   fails)
//! - client caching across sequential invocations and cache invalidation on
//!   credential rejection

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use relay_bridge::credentials::InMemorySecretStore;
use relay_bridge::{
    BridgeError, InvocationBridge, PlatformFactory, RemotePlatform, ResolvedCredentials,
    Result,
};
use relay_core::{BridgeConfig, CallHandle, CredentialSource, FunctionHandle, IntegrationPattern};

// =============================================================================
// Test Doubles
// =============================================================================

/// Mock platform counting calls per stage
struct MockPlatform {
    lookups: AtomicUsize,
    invokes: AtomicUsize,
    spawns: AtomicUsize,
    known_function: String,
    result: Value,
    reject_next_lookup: AtomicBool,
}

impl MockPlatform {
    fn new(known_function: &str, result: Value) -> Arc<Self> {
        Arc::new(Self {
            lookups: AtomicUsize::new(0),
            invokes: AtomicUsize::new(0),
            spawns: AtomicUsize::new(0),
            known_function: known_function.to_string(),
            result,
            reject_next_lookup: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl RemotePlatform for MockPlatform {
    async fn lookup_function(
        &self,
        app_name: &str,
        environment: &str,
        function_name: &str,
    ) -> Result<FunctionHandle> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.reject_next_lookup.swap(false, Ordering::SeqCst) {
            return Err(BridgeError::ClientInitializationFailed(
                "platform rejected credentials during lookup: 401 Unauthorized".into(),
            ));
        }

        if function_name != self.known_function {
            return Err(BridgeError::FunctionNotFound {
                app: app_name.to_string(),
                environment: environment.to_string(),
                function: function_name.to_string(),
            });
        }

        Ok(FunctionHandle {
            app_name: app_name.to_string(),
            environment: environment.to_string(),
            function_name: function_name.to_string(),
            function_id: "fn-mock-1".to_string(),
        })
    }

    async fn invoke(&self, _handle: &FunctionHandle, args: Vec<Value>) -> Result<Value> {
        self.invokes.fetch_add(1, Ordering::SeqCst);
        assert_eq!(args.len(), 2);
        Ok(self.result.clone())
    }

    async fn spawn(&self, _handle: &FunctionHandle, args: Vec<Value>) -> Result<CallHandle> {
        self.spawns.fetch_add(1, Ordering::SeqCst);
        assert_eq!(args.len(), 2);
        Ok(CallHandle::new("call-mock-123"))
    }
}

/// Factory handing out a shared mock platform, counting connections
struct MockFactory {
    platform: Arc<MockPlatform>,
    connects: AtomicUsize,
}

impl MockFactory {
    fn new(platform: Arc<MockPlatform>) -> Arc<Self> {
        Arc::new(Self {
            platform,
            connects: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl PlatformFactory for MockFactory {
    async fn connect(&self, credentials: ResolvedCredentials) -> Result<Arc<dyn RemotePlatform>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match credentials {
            ResolvedCredentials::Explicit(material) if material.is_empty() => {
                Err(BridgeError::ClientInitializationFailed(
                    "empty token material".into(),
                ))
            }
            _ => {
                let platform: Arc<dyn RemotePlatform> = self.platform.clone();
                Ok(platform)
            }
        }
    }
}

/// Newtype letting a shared `Arc<MockFactory>` be handed to the bridge
/// builder without an orphan-rule-violating impl on `Arc`
struct SharedFactory(Arc<MockFactory>);

#[async_trait]
impl PlatformFactory for SharedFactory {
    async fn connect(&self, credentials: ResolvedCredentials) -> Result<Arc<dyn RemotePlatform>> {
        self.0.connect(credentials).await
    }
}

fn secret_store_with_material() -> Arc<InMemorySecretStore> {
    let store = Arc::new(InMemorySecretStore::new());
    store.put(
        "relay/demo-secret",
        r#"{"TOKEN_ID":"ak-test","TOKEN_SECRET":"as-test"}"#,
    );
    store
}

fn bridge_for(
    pattern: IntegrationPattern,
    function_name: &str,
    store: Arc<InMemorySecretStore>,
    factory: Arc<MockFactory>,
) -> InvocationBridge {
    let config = BridgeConfig::builder("demo-app", "main", function_name, pattern)
        .with_credential_source(CredentialSource::Secret("relay/demo-secret".into()))
        .build()
        .expect("valid config");

    InvocationBridge::builder(config)
        .with_secret_store(store)
        .with_platform_factory(SharedFactory(factory))
        .build()
        .expect("bridge builds")
}

// =============================================================================
// Happy Paths
// =============================================================================

#[tokio::test]
async fn test_remote_invocation_returns_function_result() {
    let platform = MockPlatform::new("process", json!({"data": "test"}));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Remote,
        "process",
        secret_store_with_material(),
        factory,
    );

    let envelope = bridge.handle(json!({"input": "test"})).await.unwrap();

    let wire = serde_json::to_value(&envelope).unwrap();
    assert_eq!(wire["status"], "Success");
    assert_eq!(wire["response"], json!({"data": "test"}));
    assert_eq!(platform.invokes.load(Ordering::SeqCst), 1);
    assert_eq!(platform.spawns.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_spawn_invocation_returns_call_handle() {
    let platform = MockPlatform::new("process", json!(null));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Spawn,
        "process",
        secret_store_with_material(),
        factory,
    );

    let envelope = bridge.handle(json!({"input": "test"})).await.unwrap();

    let wire = serde_json::to_value(&envelope).unwrap();
    assert_eq!(wire["status"], "Success");
    assert_eq!(wire["response"], json!({"functionCallId": "call-mock-123"}));
    assert_eq!(platform.spawns.load(Ordering::SeqCst), 1);
    assert_eq!(platform.invokes.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Failure Ordering
// =============================================================================

#[tokio::test]
async fn test_missing_secret_stops_before_client_construction() {
    let platform = MockPlatform::new("process", json!(null));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Remote,
        "process",
        Arc::new(InMemorySecretStore::new()), // empty store
        factory.clone(),
    );

    let result = bridge.handle(json!({"input": "test"})).await;

    assert!(matches!(result, Err(BridgeError::CredentialUnavailable(_))));
    assert_eq!(factory.connects.load(Ordering::SeqCst), 0);
    assert_eq!(platform.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(platform.invokes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_malformed_secret_stops_before_client_construction() {
    let store = Arc::new(InMemorySecretStore::new());
    store.put("relay/demo-secret", r#"{"TOKEN_ID":"only-half"}"#);

    let platform = MockPlatform::new("process", json!(null));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(IntegrationPattern::Remote, "process", store, factory.clone());

    let result = bridge.handle(json!({})).await;

    assert!(matches!(result, Err(BridgeError::CredentialUnavailable(_))));
    assert_eq!(factory.connects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_unknown_function_stops_before_dispatch() {
    let platform = MockPlatform::new("process", json!(null));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Remote,
        "does-not-exist",
        secret_store_with_material(),
        factory,
    );

    let result = bridge.handle(json!({})).await;

    match result {
        Err(BridgeError::FunctionNotFound { app, environment, function }) => {
            assert_eq!(app, "demo-app");
            assert_eq!(environment, "main");
            assert_eq!(function, "does-not-exist");
        }
        other => panic!("Expected FunctionNotFound, got {:?}", other.err()),
    }
    assert_eq!(platform.lookups.load(Ordering::SeqCst), 1);
    assert_eq!(platform.invokes.load(Ordering::SeqCst), 0);
    assert_eq!(platform.spawns.load(Ordering::SeqCst), 0);
}

// =============================================================================
// Client Caching
// =============================================================================

#[tokio::test]
async fn test_client_is_cached_across_sequential_invocations() {
    let platform = MockPlatform::new("process", json!(1));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Remote,
        "process",
        secret_store_with_material(),
        factory.clone(),
    );

    bridge.handle(json!({})).await.unwrap();
    bridge.handle(json!({})).await.unwrap();
    bridge.handle(json!({})).await.unwrap();

    assert_eq!(factory.connects.load(Ordering::SeqCst), 1);
    // Lookup stays live on every invocation even with a cached client.
    assert_eq!(platform.lookups.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_credential_rejection_drops_cached_client() {
    let platform = MockPlatform::new("process", json!(1));
    let factory = MockFactory::new(platform.clone());
    let bridge = bridge_for(
        IntegrationPattern::Remote,
        "process",
        secret_store_with_material(),
        factory.clone(),
    );

    // Warm the cache.
    bridge.handle(json!({})).await.unwrap();
    assert_eq!(factory.connects.load(Ordering::SeqCst), 1);

    // The platform rejects the cached credentials once.
    platform.reject_next_lookup.store(true, Ordering::SeqCst);
    let rejected = bridge.handle(json!({})).await;
    assert!(matches!(
        rejected,
        Err(BridgeError::ClientInitializationFailed(_))
    ));

    // The next invocation must re-resolve and reconnect.
    bridge.handle(json!({})).await.unwrap();
    assert_eq!(factory.connects.load(Ordering::SeqCst), 2);
}
