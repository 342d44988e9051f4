use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct PatientFrontConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewaySettings {
    /// Base URL for upstream calls and for post-mutation redirects
    /// (e.g., http://gateway:8080).
    #[serde(default = "default_gateway_url")]
    pub url: String,
}

fn default_gateway_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
        }
    }
}

impl GatewaySettings {
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpstreamSettings {
    /// Per-request timeout. Zero would fail every call, so it is rejected.
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1, message = "upstream.timeout_secs must be at least 1"))]
    pub timeout_secs: u64,
    /// Surface non-2xx answers to add/update/delete as 502 instead of
    /// redirecting to the list anyway.
    #[serde(default = "default_check_mutation_status")]
    pub check_mutation_status: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_check_mutation_status() -> bool {
    true
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            check_mutation_status: default_check_mutation_status(),
        }
    }
}

impl PatientFrontConfig {
    pub fn load() -> Result<Self, AppError> {
        let config: Self = core_config::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would leave the front end unable to reach the
    /// patient service.
    pub fn validate(&self) -> Result<(), AppError> {
        self.upstream.validate().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("Invalid upstream settings: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: PatientFrontConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.gateway.base_url(), "http://localhost:8080");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(config.upstream.check_mutation_status);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config: PatientFrontConfig =
            serde_json::from_str(r#"{"upstream": {"timeout_secs": 0}}"#).unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_default_settings_are_valid() {
        let config: PatientFrontConfig = serde_json::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_base_url_drops_trailing_slash() {
        let gateway = GatewaySettings {
            url: "http://gateway:8080/".to_string(),
        };
        assert_eq!(gateway.base_url(), "http://gateway:8080");
    }
}
