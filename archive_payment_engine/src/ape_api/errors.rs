use apg_common::UsdAmount;
use thiserror::Error;

use crate::{
    db_types::{ItemRef, OrderId},
    traits::{CatalogApiError, PaymentGatewayError, PaymentProviderError},
};

#[derive(Debug, Clone, Error)]
pub enum CaptureFlowError {
    #[error("The requested item does not exist: {0}")]
    ItemNotFound(ItemRef),
    #[error("The {0} is not available for purchase")]
    ItemUnavailable(ItemRef),
    #[error("The submitted fee ({submitted}) does not match the price of the item ({price})")]
    FeeMismatch { submitted: UsdAmount, price: UsdAmount },
    #[error("The submitted fee ({submitted}) does not match the amount captured by the payment provider ({captured})")]
    CapturedAmountMismatch { submitted: UsdAmount, captured: UsdAmount },
    #[error("Order {0} has not been completed with the payment provider (status: {1})")]
    OrderNotCompleted(OrderId, String),
    #[error("The payment provider did not report a captured amount for order {0}")]
    MissingCapturedAmount(OrderId),
    #[error("{0}")]
    ProviderError(#[from] PaymentProviderError),
    #[error("{0}")]
    DatabaseError(#[from] PaymentGatewayError),
    #[error("{0}")]
    CatalogError(#[from] CatalogApiError),
}
