use apg_common::Secret;
use log::*;

use crate::PayPalApiError;

pub const SANDBOX_API_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

#[derive(Debug, Clone, Default)]
pub struct PayPalConfig {
    /// The REST app client id, as issued by the PayPal developer dashboard.
    pub client_id: String,
    pub client_secret: Secret<String>,
    /// The API origin, e.g. `https://api-m.paypal.com`. Defaults to the sandbox origin.
    pub api_base_url: String,
}

impl PayPalConfig {
    pub fn new(client_id: &str, client_secret: Secret<String>, api_base_url: &str) -> Self {
        Self { client_id: client_id.to_string(), client_secret, api_base_url: api_base_url.trim_end_matches('/').to_string() }
    }

    /// Builds the configuration from environment variables, failing if a required credential is absent.
    ///
    /// `PAYPAL_CLIENT_ID` and `PAYPAL_CLIENT_SECRET` are required. `PAYPAL_API_BASE_URL` is optional and falls back
    /// to the sandbox origin, which is useless in production but safe everywhere.
    pub fn try_from_env() -> Result<Self, PayPalApiError> {
        let client_id = std::env::var("PAYPAL_CLIENT_ID")
            .map_err(|e| PayPalApiError::Configuration(format!("{e} [PAYPAL_CLIENT_ID]")))?;
        let client_secret = std::env::var("PAYPAL_CLIENT_SECRET")
            .map_err(|e| PayPalApiError::Configuration(format!("{e} [PAYPAL_CLIENT_SECRET]")))?;
        let api_base_url = std::env::var("PAYPAL_API_BASE_URL").unwrap_or_else(|_| {
            info!("💳️ PAYPAL_API_BASE_URL not set. Using the sandbox API origin.");
            SANDBOX_API_BASE_URL.to_string()
        });
        Ok(Self::new(&client_id, Secret::new(client_secret), &api_base_url))
    }

    pub fn new_from_env_or_default() -> Self {
        Self::try_from_env().unwrap_or_else(|e| {
            warn!("💳️ Could not load the PayPal configuration from the environment. {e}. Using useless defaults.");
            Self::new("sb-client-id", Secret::new("sb-client-secret".to_string()), SANDBOX_API_BASE_URL)
        })
    }
}
