use std::env;

use apg_common::UsdAmount;
use archive_payment_engine::FeeSchedule;
use log::*;
use paypal_tools::PayPalConfig;

use crate::errors::ServerError;

const DEFAULT_APG_HOST: &str = "127.0.0.1";
const DEFAULT_APG_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The bond shipping surcharge schedule, applied when validating order initiation.
    pub fees: FeeSchedule,
    pub paypal: PayPalConfig,
}

impl ServerConfig {
    pub fn new(host: &str, port: u16, database_url: &str) -> Self {
        Self {
            host: host.to_string(),
            port,
            database_url: database_url.to_string(),
            fees: FeeSchedule::default(),
            paypal: PayPalConfig::default(),
        }
    }

    /// Builds the full configuration from environment variables.
    ///
    /// Optional values fall back to defaults with a log line; missing *required* values (the database URL and the
    /// PayPal credentials) are startup failures, so that misconfiguration surfaces before the first request rather
    /// than inside it.
    pub fn try_from_env() -> Result<Self, ServerError> {
        let host = env::var("APG_HOST").ok().unwrap_or_else(|| DEFAULT_APG_HOST.into());
        let port = env::var("APG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for APG_PORT. {e} Using the default, {DEFAULT_APG_PORT}, instead."
                    );
                    DEFAULT_APG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_APG_PORT);
        let database_url = env::var("APG_DATABASE_URL")
            .map_err(|e| ServerError::ConfigurationError(format!("{e} [APG_DATABASE_URL]")))?;
        let paypal = PayPalConfig::try_from_env().map_err(|e| ServerError::ConfigurationError(e.to_string()))?;
        let fees = configure_fee_schedule();
        Ok(Self { host, port, database_url, fees, paypal })
    }
}

fn configure_fee_schedule() -> FeeSchedule {
    let defaults = FeeSchedule::default();
    let handling = surcharge_from_env("APG_HANDLING_FEE", defaults.handling);
    let international = surcharge_from_env("APG_INTERNATIONAL_FEE", defaults.international);
    FeeSchedule { handling, international }
}

fn surcharge_from_env(name: &str, default: UsdAmount) -> UsdAmount {
    env::var(name)
        .map_err(|_| info!("🪛️ {name} is not set. Using the default value of {default}."))
        .and_then(|s| {
            s.parse::<UsdAmount>().map_err(|e| warn!("🪛️ Invalid configuration value for {name}. {e}"))
        })
        .ok()
        .unwrap_or(default)
}
