//! Bridge instance configuration
//!
//! A bridge instance is provisioned against exactly one remote
//! app/environment/function tuple with one integration pattern and one static
//! parameter payload. The configuration is read once at construction and is
//! immutable for the lifetime of the instance.

use std::env;
use std::time::Duration;

use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::types::IntegrationPattern;

/// Environment variable names the deployed bridge is provisioned with
pub mod env_vars {
    pub const APP_NAME: &str = "RELAY_APP_NAME";
    pub const ENVIRONMENT_NAME: &str = "RELAY_ENVIRONMENT_NAME";
    pub const FUNCTION_NAME: &str = "RELAY_FUNCTION_NAME";
    pub const INTEGRATION_PATTERN: &str = "RELAY_INTEGRATION_PATTERN";
    pub const PARAMETERS: &str = "RELAY_PARAMETERS";
    pub const SECRET_REF: &str = "RELAY_SECRET_REF";
    pub const DELIMITER: &str = "RELAY_DELIMITER";
    pub const INVOKE_TIMEOUT_SECS: &str = "RELAY_INVOKE_TIMEOUT_SECS";
}

/// Default invoke timeout for synchronous dispatch
pub const DEFAULT_INVOKE_TIMEOUT: Duration = Duration::from_secs(300);

/// Where the bridge obtains remote-platform credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Fetch credential material from the external secret store by reference
    Secret(String),
    /// Rely on ambient federated identity; the exchange happens inside the
    /// client factory
    Federated,
}

/// Configuration for one bridge instance
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// The remote application namespace
    pub app_name: String,
    /// The deployment environment within the app
    pub environment: String,
    /// The remote function to invoke
    pub function_name: String,
    /// Invocation semantics for this instance
    pub integration_pattern: IntegrationPattern,
    /// Static parameters merged into every invocation as the second
    /// positional argument
    pub params: Value,
    /// Credential source for the remote platform
    pub credential_source: CredentialSource,
    /// Delimiter inserted between function name and pattern in derived
    /// resource names
    pub delimiter: String,
    /// Upper bound on one synchronous invocation
    pub invoke_timeout: Duration,
}

impl BridgeConfig {
    /// Start building a configuration for the given target tuple
    pub fn builder(
        app_name: impl Into<String>,
        environment: impl Into<String>,
        function_name: impl Into<String>,
        integration_pattern: IntegrationPattern,
    ) -> BridgeConfigBuilder {
        BridgeConfigBuilder {
            app_name: app_name.into(),
            environment: environment.into(),
            function_name: function_name.into(),
            integration_pattern,
            params: Value::Object(Default::default()),
            credential_source: CredentialSource::Federated,
            delimiter: String::new(),
            invoke_timeout: DEFAULT_INVOKE_TIMEOUT,
        }
    }

    /// Load the configuration from the provisioned environment variables
    ///
    /// Required: app name, environment, function name, integration pattern.
    /// Optional with defaults: parameters (`{}`), delimiter (empty), invoke
    /// timeout (300 s). A secret reference selects explicit-secret mode;
    /// absence means federated identity.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Load the configuration through an arbitrary variable lookup
    ///
    /// [`BridgeConfig::from_env`] is this applied to the process
    /// environment; tests substitute a map to stay clear of process-global
    /// state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |var: &str| -> Result<String> {
            lookup(var).ok_or_else(|| ConfigError::MissingVar(var.to_string()))
        };

        let pattern_raw = require(env_vars::INTEGRATION_PATTERN)?;
        let integration_pattern = pattern_raw
            .parse::<IntegrationPattern>()
            .map_err(ConfigError::InvalidPattern)?;

        let params = match lookup(env_vars::PARAMETERS) {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| ConfigError::InvalidParameters(e.to_string()))?,
            None => Value::Object(Default::default()),
        };

        let credential_source = match lookup(env_vars::SECRET_REF) {
            Some(reference) => CredentialSource::Secret(reference),
            None => CredentialSource::Federated,
        };

        let invoke_timeout = match lookup(env_vars::INVOKE_TIMEOUT_SECS) {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?;
                Duration::from_secs(secs)
            }
            None => DEFAULT_INVOKE_TIMEOUT,
        };

        let config = Self {
            app_name: require(env_vars::APP_NAME)?,
            environment: require(env_vars::ENVIRONMENT_NAME)?,
            function_name: require(env_vars::FUNCTION_NAME)?,
            integration_pattern,
            params,
            credential_source,
            delimiter: lookup(env_vars::DELIMITER).unwrap_or_default(),
            invoke_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Derived resource name: `{function}{delimiter}_{pattern}`
    pub fn function_identifier(&self) -> String {
        format!(
            "{}{}_{}",
            self.function_name, self.delimiter, self.integration_pattern
        )
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("app name", &self.app_name),
            ("environment", &self.environment),
            ("function name", &self.function_name),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{} must not be empty", field)));
            }
        }
        if let CredentialSource::Secret(reference) = &self.credential_source {
            if reference.is_empty() {
                return Err(ConfigError::Invalid(
                    "secret reference must not be empty".into(),
                ));
            }
        }
        Ok(())
    }
}

/// Builder for [`BridgeConfig`]
pub struct BridgeConfigBuilder {
    app_name: String,
    environment: String,
    function_name: String,
    integration_pattern: IntegrationPattern,
    params: Value,
    credential_source: CredentialSource,
    delimiter: String,
    invoke_timeout: Duration,
}

impl BridgeConfigBuilder {
    /// Set the static parameter payload
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = params;
        self
    }

    /// Set the credential source
    pub fn with_credential_source(mut self, source: CredentialSource) -> Self {
        self.credential_source = source;
        self
    }

    /// Set the resource-name delimiter
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Set the invoke timeout
    pub fn with_invoke_timeout(mut self, timeout: Duration) -> Self {
        self.invoke_timeout = timeout;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> Result<BridgeConfig> {
        let config = BridgeConfig {
            app_name: self.app_name,
            environment: self.environment,
            function_name: self.function_name,
            integration_pattern: self.integration_pattern,
            params: self.params,
            credential_source: self.credential_source,
            delimiter: self.delimiter,
            invoke_timeout: self.invoke_timeout,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_builder() -> BridgeConfigBuilder {
        BridgeConfig::builder("demo-app", "main", "process", IntegrationPattern::Remote)
    }

    #[test]
    fn test_builder_defaults() {
        let config = base_builder().build().unwrap();
        assert_eq!(config.params, json!({}));
        assert_eq!(config.credential_source, CredentialSource::Federated);
        assert_eq!(config.delimiter, "");
        assert_eq!(config.invoke_timeout, DEFAULT_INVOKE_TIMEOUT);
    }

    #[test]
    fn test_function_identifier() {
        let config = base_builder().build().unwrap();
        assert_eq!(config.function_identifier(), "process_remote");

        let config = base_builder().with_delimiter("-v2").build().unwrap();
        assert_eq!(config.function_identifier(), "process-v2_remote");
    }

    #[test]
    fn test_empty_fields_rejected() {
        let result = BridgeConfig::builder("", "main", "process", IntegrationPattern::Spawn).build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let result = base_builder()
            .with_credential_source(CredentialSource::Secret(String::new()))
            .build();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    const REQUIRED_VARS: [(&str, &str); 4] = [
        (env_vars::APP_NAME, "demo-app"),
        (env_vars::ENVIRONMENT_NAME, "main"),
        (env_vars::FUNCTION_NAME, "process"),
        (env_vars::INTEGRATION_PATTERN, "remote"),
    ];

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |var| {
            pairs
                .iter()
                .find(|(name, _)| *name == var)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn test_from_lookup_required_only_uses_defaults() {
        let config = BridgeConfig::from_lookup(lookup_from(&REQUIRED_VARS)).unwrap();
        assert_eq!(config.app_name, "demo-app");
        assert_eq!(config.environment, "main");
        assert_eq!(config.function_name, "process");
        assert_eq!(config.integration_pattern, IntegrationPattern::Remote);
        assert_eq!(config.params, json!({}));
        assert_eq!(config.credential_source, CredentialSource::Federated);
        assert_eq!(config.delimiter, "");
        assert_eq!(config.invoke_timeout, DEFAULT_INVOKE_TIMEOUT);
    }

    #[test]
    fn test_from_lookup_full_surface() {
        let mut vars = REQUIRED_VARS.to_vec();
        vars.extend([
            (env_vars::PARAMETERS, r#"{"mode":"batch"}"#),
            (env_vars::SECRET_REF, "relay/demo-secret"),
            (env_vars::DELIMITER, "-v2"),
            (env_vars::INVOKE_TIMEOUT_SECS, "60"),
        ]);
        let config = BridgeConfig::from_lookup(lookup_from(&vars)).unwrap();
        assert_eq!(config.params, json!({"mode": "batch"}));
        assert_eq!(
            config.credential_source,
            CredentialSource::Secret("relay/demo-secret".into())
        );
        assert_eq!(config.delimiter, "-v2");
        assert_eq!(config.invoke_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_from_lookup_reports_each_missing_var() {
        for missing in 0..REQUIRED_VARS.len() {
            let vars: Vec<_> = REQUIRED_VARS
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != missing)
                .map(|(_, pair)| *pair)
                .collect();
            match BridgeConfig::from_lookup(lookup_from(&vars)) {
                Err(ConfigError::MissingVar(var)) => assert_eq!(var, REQUIRED_VARS[missing].0),
                other => panic!("expected MissingVar, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_from_lookup_rejects_unknown_pattern() {
        let mut vars = REQUIRED_VARS.to_vec();
        vars[3] = (env_vars::INTEGRATION_PATTERN, "invalid");
        match BridgeConfig::from_lookup(lookup_from(&vars)) {
            Err(ConfigError::InvalidPattern(value)) => assert_eq!(value, "invalid"),
            other => panic!("expected InvalidPattern, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_rejects_malformed_parameters() {
        let mut vars = REQUIRED_VARS.to_vec();
        vars.push((env_vars::PARAMETERS, "not-json"));
        assert!(matches!(
            BridgeConfig::from_lookup(lookup_from(&vars)),
            Err(ConfigError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_from_lookup_rejects_non_numeric_timeout() {
        let mut vars = REQUIRED_VARS.to_vec();
        vars.push((env_vars::INVOKE_TIMEOUT_SECS, "ten"));
        match BridgeConfig::from_lookup(lookup_from(&vars)) {
            Err(ConfigError::InvalidTimeout(value)) => assert_eq!(value, "ten"),
            other => panic!("expected InvalidTimeout, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_secret_source() {
        let config = base_builder()
            .with_credential_source(CredentialSource::Secret("relay/demo-secret".into()))
            .build()
            .unwrap();
        assert_eq!(
            config.credential_source,
            CredentialSource::Secret("relay/demo-secret".into())
        );
    }
}
