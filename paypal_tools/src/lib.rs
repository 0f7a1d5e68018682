//! A self-contained client for the PayPal Checkout REST API (v2).
//!
//! The client covers the two calls the payment gateway needs: creating a checkout order, and fetching an order's
//! details (status, payer identity, captured amount) after the buyer has approved it. Authentication uses the
//! OAuth2 client-credentials grant; access tokens are cached in-process and refreshed shortly before they expire.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::PayPalApi;
pub use config::PayPalConfig;
pub use data_objects::{
    AccessToken,
    Address,
    Amount,
    AmountBreakdown,
    Money,
    NewCheckoutOrder,
    NewPurchaseUnit,
    Payer,
    PayerName,
    PayPalOrder,
    Phone,
    PhoneNumber,
    PurchaseUnit,
    Shipping,
};
pub use error::PayPalApiError;
