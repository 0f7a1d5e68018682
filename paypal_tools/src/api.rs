use std::{sync::Arc, time::Duration};

use apg_common::UsdAmount;
use chrono::{DateTime, Utc};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::PayPalConfig,
    data_objects::{AccessToken, NewCheckoutOrder, PayPalOrder},
    PayPalApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_EXPIRY_BUFFER: chrono::Duration = chrono::Duration::minutes(5);
const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Utc::now() + TOKEN_EXPIRY_BUFFER < self.expires_at
    }
}

#[derive(Clone)]
pub struct PayPalApi {
    config: PayPalConfig,
    client: Arc<Client>,
    token: Arc<Mutex<Option<CachedToken>>>,
}

impl PayPalApi {
    pub fn new(config: PayPalConfig) -> Result<Self, PayPalApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PayPalApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), token: Arc::new(Mutex::new(None)) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_base_url)
    }

    /// Returns a valid access token, fetching a new one via the client-credentials grant if the cached token is
    /// missing or about to expire.
    async fn access_token(&self) -> Result<String, PayPalApiError> {
        let mut cache = self.token.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.is_valid() {
                return Ok(cached.token.clone());
            }
        }
        debug!("💳️ Requesting a new PayPal access token");
        let response = self
            .client
            .post(self.url("/v1/oauth2/token"))
            .basic_auth(&self.config.client_id, Some(self.config.client_secret.reveal()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PayPalApiError::AuthenticationError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!("💳️ Failed to retrieve a PayPal access token. Status {status}. {message}");
            return Err(PayPalApiError::AuthenticationError(format!("Status {status}. {message}")));
        }
        let token: AccessToken =
            response.json().await.map_err(|e| PayPalApiError::JsonError(e.to_string()))?;
        let lifetime = token.expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let cached = CachedToken {
            token: token.access_token.clone(),
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        };
        *cache = Some(cached);
        info!("💳️ PayPal access token retrieved. Valid for {lifetime}s");
        Ok(token.access_token)
    }

    /// Sends a single authenticated request against the checkout API. There is no retry; a failed call is
    /// reported to the caller as-is.
    async fn checkout_request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PayPalApiError> {
        let token = self.access_token().await?;
        let url = self.url(path);
        trace!("💳️ Sending checkout request: {url}");
        let mut req = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PayPalApiError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("💳️ Checkout request successful. {}", response.status());
            response.json::<T>().await.map_err(|e| PayPalApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PayPalApiError::ResponseError(e.to_string()))?;
            Err(PayPalApiError::QueryError { status, message })
        }
    }

    /// Creates a checkout order for the given item reference and amount.
    ///
    /// Corresponds to `POST /v2/checkout/orders`. Returns PayPal's order record, whose `id` the storefront needs to
    /// launch the approval flow.
    pub async fn create_order(&self, reference_id: &str, amount: UsdAmount) -> Result<PayPalOrder, PayPalApiError> {
        let body = NewCheckoutOrder::capture(reference_id, amount);
        debug!("💳️ Creating PayPal order for {reference_id}, amount {amount}");
        let order =
            self.checkout_request::<PayPalOrder, NewCheckoutOrder>(Method::POST, "/v2/checkout/orders", Some(body)).await?;
        info!("💳️ PayPal order created: {}", order.id);
        Ok(order)
    }

    /// Fetches the current state of an order, including payer identity and shipping details once approved.
    ///
    /// Corresponds to `GET /v2/checkout/orders/{id}`.
    pub async fn get_order_details(&self, order_id: &str) -> Result<PayPalOrder, PayPalApiError> {
        let path = format!("/v2/checkout/orders/{order_id}");
        debug!("💳️ Fetching PayPal order details for {order_id}");
        let order = self.checkout_request::<PayPalOrder, ()>(Method::GET, &path, None).await?;
        info!("💳️ PayPal order details retrieved for {order_id}");
        Ok(order)
    }
}
