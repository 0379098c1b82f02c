//! Engine configuration loaded from environment variables.
//!
//! Every value has a default, so `from_env` only fails on values that are
//! present but unparseable.
//!
//! # Environment Variables
//!
//! - `MEARIM_MERCHANT_NAME` - Merchant name used in the message greeting
//!   (default: `Atacarejo São Manoel`)
//! - `MEARIM_WHATSAPP_NUMBER` - Merchant WhatsApp number for the handoff URI,
//!   digits only (default: `5599984201432`)
//! - `MEARIM_NAMESPACE` - Key namespace prefix in the persistent layer
//!   (default: `atacarejo`, the layout existing installs already have)
//! - `MEARIM_HANDOFF_DELAY_SECS` - Handoff-preparation delay in seconds
//!   (default: `3`)

use std::env;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Merchant name used in the order-message greeting.
    pub merchant_name: String,
    /// Merchant WhatsApp number (digits only) for the handoff URI.
    pub whatsapp_number: String,
    /// Namespace prefix for all persistent keys.
    pub namespace: String,
    /// Fixed delay representing "preparing the handoff".
    pub handoff_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            merchant_name: "Atacarejo São Manoel".to_owned(),
            whatsapp_number: "5599984201432".to_owned(),
            namespace: "atacarejo".to_owned(),
            handoff_delay: Duration::from_secs(3),
        }
    }
}

impl EngineConfig {
    /// Loads the configuration from the environment, falling back to
    /// defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] when a set variable cannot be
    /// parsed (non-numeric delay, non-digit WhatsApp number).
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(name) = env::var("MEARIM_MERCHANT_NAME")
            && !name.trim().is_empty()
        {
            config.merchant_name = name.trim().to_owned();
        }

        if let Ok(number) = env::var("MEARIM_WHATSAPP_NUMBER") {
            let number = number.trim().to_owned();
            if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err(ConfigError::InvalidEnvVar(
                    "MEARIM_WHATSAPP_NUMBER".to_owned(),
                    "must be digits only".to_owned(),
                ));
            }
            config.whatsapp_number = number;
        }

        if let Ok(namespace) = env::var("MEARIM_NAMESPACE")
            && !namespace.trim().is_empty()
        {
            config.namespace = namespace.trim().to_owned();
        }

        if let Ok(delay) = env::var("MEARIM_HANDOFF_DELAY_SECS") {
            let secs: u64 = delay.trim().parse().map_err(|_| {
                ConfigError::InvalidEnvVar(
                    "MEARIM_HANDOFF_DELAY_SECS".to_owned(),
                    format!("not a number of seconds: {delay}"),
                )
            })?;
            config.handoff_delay = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
