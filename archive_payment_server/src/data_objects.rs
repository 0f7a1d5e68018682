use apg_common::UsdAmount;
use archive_payment_engine::{db_types::ItemRef, ProviderOrder};
use serde::{Deserialize, Serialize};

/// Body of `POST /create-order`. The fee is the total the storefront is asking the buyer to pay, which must be a
/// legitimate total for the item's configured price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub item_id: ItemRef,
    pub fee: UsdAmount,
}

/// Body of `POST /capture-order/{order_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOrderRequest {
    pub item_id: ItemRef,
    pub fee: UsdAmount,
    #[serde(default)]
    pub pickup: bool,
}

/// Response of `POST /create-order`: the provider's order id and status, passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedResponse {
    pub id: String,
    pub status: String,
}

impl From<ProviderOrder> for OrderCreatedResponse {
    fn from(order: ProviderOrder) -> Self {
        Self { id: order.order_id.0, status: order.status.to_string() }
    }
}

/// Response of `POST /capture-order/{order_id}`. Idempotent replays omit the transaction id and change the
/// message, but still return 200 so client-side retry handling stays trivial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureOrderResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<i64>,
}

impl CaptureOrderResponse {
    pub fn success(transaction_id: i64) -> Self {
        Self { message: "Success".to_string(), transaction_id: Some(transaction_id) }
    }

    pub fn already_processed() -> Self {
        Self { message: "Order already processed".to_string(), transaction_id: None }
    }
}
