use thiserror::Error;

use crate::{
    db_types::{ItemRef, NewCapture, OrderId, Transaction},
    traits::{CatalogApiError, CatalogManagement},
};

/// This trait defines the write side of the capture flow for backends supporting the archive payment engine.
///
/// There is exactly one mutating operation: recording a provider-verified capture. Items are seed data and donors
/// and transactions only ever come into existence through that operation, so the whole write surface is a single
/// atomic unit.
#[allow(async_fn_in_trait)]
pub trait PaymentGatewayDatabase: Clone + CatalogManagement {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Records a verified capture in a single atomic transaction:
    /// * resolves the donor by normalized email (creating or overlaying as needed),
    /// * flips the item's availability (record: `adopted`, bond: `status = purchased`),
    /// * links the donor to the record with the fee paid (historical records only),
    /// * inserts the transaction row with `COMPLETED` status.
    ///
    /// The call is idempotent on the provider order id. Returns the transaction and `true` if this call inserted
    /// it, or the existing transaction and `false` if the order id had already been processed (including losing a
    /// race against a concurrent capture of the same order).
    ///
    /// On any failure, no partial donor/item/transaction state is left behind.
    async fn record_capture(&self, capture: NewCapture) -> Result<(Transaction, bool), PaymentGatewayError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), PaymentGatewayError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The requested item does not exist: {0}")]
    ItemNotFound(ItemRef),
    #[error("A transaction already exists for order {0}")]
    TransactionAlreadyExists(OrderId),
    #[error("{0}")]
    CatalogError(#[from] CatalogApiError),
}

impl From<sqlx::Error> for PaymentGatewayError {
    fn from(e: sqlx::Error) -> Self {
        PaymentGatewayError::DatabaseError(e.to_string())
    }
}
