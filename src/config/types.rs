//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/tintero/) and project (.tintero/) level
//! configuration. Secrets are never serialized back out and are redacted in
//! debug output; constructors convert them to `SecretString` for runtime use.

use serde::{Deserialize, Serialize};

use crate::constants::{export, network, payment, words};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Inference endpoint settings
    pub inference: InferenceConfig,

    /// Payment provider and gating settings
    pub payment: PaymentConfig,

    /// Pipeline behavior settings
    pub pipeline: PipelineConfig,

    /// Document export settings
    pub export: ExportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            inference: InferenceConfig::default(),
            payment: PaymentConfig::default(),
            pipeline: PipelineConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `TinteroError::Config` on validation failure.
    pub fn validate(&self) -> crate::types::Result<()> {
        if self.inference.timeout_secs == 0 {
            return Err(crate::types::TinteroError::Config(
                "inference timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.max_words == 0 {
            return Err(crate::types::TinteroError::Config(
                "pipeline max_words must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.min_words > self.pipeline.max_words {
            return Err(crate::types::TinteroError::Config(format!(
                "pipeline min_words ({}) must not exceed max_words ({})",
                self.pipeline.min_words, self.pipeline.max_words
            )));
        }

        if self.payment.token_ttl_mins == 0 {
            return Err(crate::types::TinteroError::Config(
                "payment token_ttl_mins must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Inference Configuration
// =============================================================================

/// Settings for the hosted chat-completion endpoint
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// API base URL
    pub api_base: String,

    /// Model identifier sent with every request
    pub model: String,

    /// Request timeout in seconds; the only bound on worst-case latency
    pub timeout_secs: u64,

    /// API key. Falls back to the TOGETHER_API_KEY environment variable.
    /// Never serialized to output for security.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.together.xyz/v1".to_string(),
            model: "mistralai/Mixtral-8x7B-Instruct-v0.1".to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            api_key: None,
        }
    }
}

// =============================================================================
// Payment Configuration
// =============================================================================

/// How the success redirect carries the paid credential back
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RedirectCredential {
    /// Provider substitutes the session id into the success URL; verification
    /// is a remote session lookup
    #[default]
    SessionId,
    /// A freshly minted signed token rides the success URL; verification is
    /// local signature + expiry checking
    SignedToken,
}

/// What the checkout session charges
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum ChargeConfig {
    /// Resolve the product's first active price at session creation
    Price { product_id: String },
    /// Inline fixed amount in minor units
    Amount {
        product_name: String,
        currency: String,
        unit_amount: u64,
    },
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self::Amount {
            product_name: "Análisis Literario y Corrección de Estilo".to_string(),
            currency: payment::DEFAULT_CURRENCY.to_string(),
            unit_amount: payment::DEFAULT_UNIT_AMOUNT,
        }
    }
}

/// Payment provider settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Payment provider API base URL
    pub api_base: String,

    /// Public base URL the provider redirects back to after checkout
    pub app_url: String,

    /// How the success redirect carries the credential
    pub redirect: RedirectCredential,

    /// Charge configuration (resolved price vs. inline amount)
    pub charge: ChargeConfig,

    /// Signed access token validity in minutes
    pub token_ttl_mins: u64,

    /// Provider secret key. Falls back to the STRIPE_SECRET_KEY environment
    /// variable. Never serialized to output for security.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,

    /// Symmetric key for signing access tokens. Falls back to the
    /// TINTERO_SIGNING_SECRET environment variable. Never serialized.
    #[serde(default, skip_serializing)]
    pub signing_secret: Option<String>,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("api_base", &self.api_base)
            .field("app_url", &self.app_url)
            .field("redirect", &self.redirect)
            .field("charge", &self.charge)
            .field("token_ttl_mins", &self.token_ttl_mins)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .field(
                "signing_secret",
                &self.signing_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.stripe.com/v1".to_string(),
            app_url: "https://correcciones.example.com".to_string(),
            redirect: RedirectCredential::default(),
            charge: ChargeConfig::default(),
            token_ttl_mins: payment::TOKEN_VALIDITY_MINS,
            secret_key: None,
            signing_secret: None,
        }
    }
}

// =============================================================================
// Pipeline Configuration
// =============================================================================

/// Where the payment gate sits in the pipeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GateMode {
    /// No gating; the whole pipeline is free
    #[default]
    Disabled,
    /// Verification required before any inference call
    BeforeAnalysis,
    /// Analysis is free; correction and document export require verification
    BeforeExport,
}

impl GateMode {
    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

/// What happens when a correction call fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CorrectionPolicy {
    /// Single whole-text correction call; any failure halts the run
    #[default]
    HaltOnError,
    /// Correct paragraph by paragraph; a failed call re-emits the original
    /// paragraph unchanged (best effort, don't lose data)
    ParagraphFallback,
}

/// Pipeline behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Minimum accepted word count
    pub min_words: usize,

    /// Maximum accepted word count
    pub max_words: usize,

    /// Payment gate position
    pub gate: GateMode,

    /// Correction failure policy
    pub correction: CorrectionPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_words: words::DEFAULT_MIN_WORDS,
            max_words: words::DEFAULT_MAX_WORDS,
            gate: GateMode::default(),
            correction: CorrectionPolicy::default(),
        }
    }
}

// =============================================================================
// Export Configuration
// =============================================================================

/// Document export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Centered document title
    pub title: String,

    /// Output filename
    pub filename: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            title: "Análisis Literario y Corrección de Estilo".to_string(),
            filename: export::DEFAULT_FILENAME.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pipeline.max_words, 2000);
        assert_eq!(config.pipeline.min_words, 0);
        assert_eq!(config.inference.timeout_secs, 60);
    }

    #[test]
    fn test_validate_rejects_inverted_word_bounds() {
        let mut config = Config::default();
        config.pipeline.min_words = 100;
        config.pipeline.max_words = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.inference.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secrets_never_serialized() {
        let mut config = Config::default();
        config.inference.api_key = Some("sk-secret".to_string());
        config.payment.secret_key = Some("sk_live_secret".to_string());
        config.payment.signing_secret = Some("hmac-secret".to_string());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("sk_live_secret"));
        assert!(!rendered.contains("hmac-secret"));

        let debugged = format!("{:?}", config);
        assert!(!debugged.contains("sk-secret"));
        assert!(debugged.contains("REDACTED"));
    }

    #[test]
    fn test_charge_config_toml_round_trip() {
        let toml_src = r#"
            mode = "price"
            product_id = "prod_123"
        "#;
        let charge: ChargeConfig = toml::from_str(toml_src).unwrap();
        assert_eq!(
            charge,
            ChargeConfig::Price {
                product_id: "prod_123".to_string()
            }
        );
    }

    #[test]
    fn test_gate_mode_kebab_case() {
        let mode: GateMode = serde_json::from_str("\"before-export\"").unwrap();
        assert_eq!(mode, GateMode::BeforeExport);
        assert!(mode.is_enabled());
        assert!(!GateMode::Disabled.is_enabled());
    }
}
