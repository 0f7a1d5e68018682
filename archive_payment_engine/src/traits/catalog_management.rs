use thiserror::Error;
use uuid::Uuid;

use crate::{
    ape_api::{BondQueryFilter, RecordQueryFilter},
    db_types::{Bond, Donor, HistoricalRecord, ItemAvailability, ItemRef, OrderId, Transaction},
};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("User error constructing query: {0}")]
    QueryError(String),
}

impl From<sqlx::Error> for CatalogApiError {
    fn from(e: sqlx::Error) -> Self {
        CatalogApiError::DatabaseError(e.to_string())
    }
}

/// Read-only access to the catalog (records and bonds) and the purchase ledger (donors and transactions).
///
/// Everything here is side-effect free; mutations happen exclusively through
/// [`PaymentGatewayDatabase`](crate::traits::PaymentGatewayDatabase).
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    /// Fetches a historical record by its UUID. `None` if no such record exists.
    async fn fetch_record(&self, id: &Uuid) -> Result<Option<HistoricalRecord>, CatalogApiError>;

    /// Fetches a bond by its code. `None` if no such bond exists.
    async fn fetch_bond(&self, bond_id: &str) -> Result<Option<Bond>, CatalogApiError>;

    /// Fetches historical records matching the filter, available items first, newest first within each group.
    async fn fetch_records(&self, filter: RecordQueryFilter) -> Result<Vec<HistoricalRecord>, CatalogApiError>;

    /// Fetches bonds matching the filter.
    async fn fetch_bonds(&self, filter: BondQueryFilter) -> Result<Vec<Bond>, CatalogApiError>;

    /// The price and availability of the referenced item, whichever kind it is. `None` if the item does not exist.
    async fn fetch_item_availability(&self, item: &ItemRef) -> Result<Option<ItemAvailability>, CatalogApiError>;

    /// All donors that have adopted the given record.
    async fn fetch_donors_for_record(&self, id: &Uuid) -> Result<Vec<Donor>, CatalogApiError>;

    /// Fetches the transaction recorded for the given provider order id, if any.
    async fn fetch_transaction_by_order_id(&self, order_id: &OrderId) -> Result<Option<Transaction>, CatalogApiError>;

    /// Case-insensitive donor lookup by email.
    async fn fetch_donor_by_email(&self, email: &str) -> Result<Option<Donor>, CatalogApiError>;

    /// All transactions recorded for the given donor, newest first.
    async fn fetch_transactions_for_donor(&self, donor_id: i64) -> Result<Vec<Transaction>, CatalogApiError>;
}
