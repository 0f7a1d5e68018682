use std::{fmt::Display, str::FromStr};

use apg_common::UsdAmount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{ItemRef, OrderId, PayerDetails};

#[derive(Debug, Clone, Error)]
pub enum PaymentProviderError {
    #[error("Could not reach the payment provider: {0}")]
    Unreachable(String),
    #[error("The payment provider rejected the request. Status {status}. {message}")]
    RequestRejected { status: u16, message: String },
    #[error("The payment provider returned an unusable response: {0}")]
    InvalidResponse(String),
}

//--------------------------------------  ProviderOrderStatus  -------------------------------------------------------
/// The provider's view of an order's lifecycle. Only `Completed` orders may be captured locally; every other state
/// is carried verbatim so it can be surfaced to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderOrderStatus {
    Created,
    Approved,
    Completed,
    Other(String),
}

impl FromStr for ProviderOrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CREATED" => Ok(Self::Created),
            "APPROVED" => Ok(Self::Approved),
            "COMPLETED" => Ok(Self::Completed),
            other => Ok(Self::Other(other.to_string())),
        }
    }
}

impl Display for ProviderOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderOrderStatus::Created => write!(f, "CREATED"),
            ProviderOrderStatus::Approved => write!(f, "APPROVED"),
            ProviderOrderStatus::Completed => write!(f, "COMPLETED"),
            ProviderOrderStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

//--------------------------------------     ProviderOrder     -------------------------------------------------------
/// The provider's order record, reduced to the fields the capture flow acts on. The provider is authoritative for
/// the completion status, the captured amount, and the payer's identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderOrder {
    pub order_id: OrderId,
    pub status: ProviderOrderStatus,
    pub amount: Option<UsdAmount>,
    pub payer: Option<PayerDetails>,
}

/// The seam to the external payment service.
///
/// Implementations make exactly one attempt per call; retry policy, if any, belongs to the caller (and the server
/// deliberately has none).
#[allow(async_fn_in_trait)]
pub trait PaymentProvider {
    /// Asks the provider to create an order for the given item reference and amount.
    async fn create_order(&self, item: &ItemRef, amount: UsdAmount) -> Result<ProviderOrder, PaymentProviderError>;

    /// Fetches the order's current state, including payer identity once the buyer has approved it.
    async fn get_order_details(&self, order_id: &OrderId) -> Result<ProviderOrder, PaymentProviderError>;
}
