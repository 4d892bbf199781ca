//! Federated-identity trust binding
//!
//! The bridge's execution identity obtains short-lived remote-platform
//! credentials by presenting a signed identity token. The trust binding is
//! the policy material that makes this exchange possible while scoping it to
//! exactly one workspace/environment/app/function tuple.
//!
//! The binding itself is consumed by the external infrastructure-provisioning
//! engine; this module only renders it deterministically.

use serde_json::Value;

/// Default audience pinned in the federation condition
pub const DEFAULT_AUDIENCE: &str = "oidc.relay.dev";

/// A federated-identity trust statement for one remote function
///
/// The subject pattern wildcards only the trailing segment, distinguishing
/// invocation-instance identifiers within one function. It must never grant
/// access beyond the declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustBinding {
    /// Remote workspace identifier
    pub workspace_id: String,
    /// Deployment environment name
    pub environment: String,
    /// Remote application name
    pub app_name: String,
    /// Remote function name
    pub function_name: String,
    /// Identity-provider audience
    pub audience: String,
}

impl TrustBinding {
    /// Create a trust binding for one workspace/environment/app/function tuple
    pub fn new(
        workspace_id: impl Into<String>,
        environment: impl Into<String>,
        app_name: impl Into<String>,
        function_name: impl Into<String>,
    ) -> Self {
        Self {
            workspace_id: workspace_id.into(),
            environment: environment.into(),
            app_name: app_name.into(),
            function_name: function_name.into(),
            audience: DEFAULT_AUDIENCE.to_string(),
        }
    }

    /// Override the identity-provider audience
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = audience.into();
        self
    }

    /// The subject claim pattern, in fixed field order
    ///
    /// `workspace_id:{ws}:environment_name:{env}:app_name:{app}:function_name:{fn}:*`
    pub fn subject_pattern(&self) -> String {
        format!(
            "workspace_id:{}:environment_name:{}:app_name:{}:function_name:{}:*",
            self.workspace_id, self.environment, self.app_name, self.function_name
        )
    }

    /// The condition block for the provisioning engine's trust policy
    ///
    /// The audience is matched exactly; the subject is matched against the
    /// wildcard-suffixed pattern.
    pub fn conditions(&self) -> Value {
        serde_json::json!({
            "StringEquals": { "aud": self.audience },
            "StringLike": { "sub": self.subject_pattern() },
        })
    }
}
