//! `SqliteDatabase` is a concrete implementation of an archive payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module.
use std::fmt::Debug;

use log::*;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::db::{donors, items, new_pool, transactions};
use crate::{
    ape_api::{BondQueryFilter, RecordQueryFilter},
    db_types::{
        Bond,
        Donor,
        HistoricalRecord,
        ItemAvailability,
        ItemRef,
        NewCapture,
        NewTransaction,
        OrderId,
        PaymentStatus,
        Transaction,
    },
    traits::{CatalogApiError, CatalogManagement, PaymentGatewayDatabase, PaymentGatewayError},
};

pub const PAYMENT_METHOD: &str = "PayPal";

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool for the given database URL.
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Run once at startup; migrations that have already been applied are skipped.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations are up to date");
        Ok(())
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_record(&self, id: &Uuid) -> Result<Option<HistoricalRecord>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(items::fetch_record(id, &mut conn).await?)
    }

    async fn fetch_bond(&self, bond_id: &str) -> Result<Option<Bond>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(items::fetch_bond(bond_id, &mut conn).await?)
    }

    async fn fetch_records(&self, filter: RecordQueryFilter) -> Result<Vec<HistoricalRecord>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(items::fetch_records(filter, &mut conn).await?)
    }

    async fn fetch_bonds(&self, filter: BondQueryFilter) -> Result<Vec<Bond>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(items::fetch_bonds(filter, &mut conn).await?)
    }

    async fn fetch_item_availability(&self, item: &ItemRef) -> Result<Option<ItemAvailability>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(items::fetch_item_availability(item, &mut conn).await?)
    }

    async fn fetch_donors_for_record(&self, id: &Uuid) -> Result<Vec<Donor>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(donors::fetch_donors_for_record(id, &mut conn).await?)
    }

    async fn fetch_transaction_by_order_id(&self, order_id: &OrderId) -> Result<Option<Transaction>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(transactions::fetch_by_order_id(order_id, &mut conn).await?)
    }

    async fn fetch_donor_by_email(&self, email: &str) -> Result<Option<Donor>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(donors::fetch_donor_by_email(email, &mut conn).await?)
    }

    async fn fetch_transactions_for_donor(&self, donor_id: i64) -> Result<Vec<Transaction>, CatalogApiError> {
        let mut conn = self.pool.acquire().await.map_err(CatalogApiError::from)?;
        Ok(transactions::fetch_for_donor(donor_id, &mut conn).await?)
    }
}

impl PaymentGatewayDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn record_capture(&self, capture: NewCapture) -> Result<(Transaction, bool), PaymentGatewayError> {
        let mut tx = self.pool.begin().await?;
        if let Some(existing) = transactions::fetch_by_order_id(&capture.order_id, &mut tx).await? {
            debug!("🗃️ Order {} already has transaction #{}. Nothing to record.", capture.order_id, existing.id);
            return Ok((existing, false));
        }
        let donor = donors::upsert_donor(&capture.payer, &mut tx).await?;
        match &capture.item {
            ItemRef::Record(id) => {
                if !items::mark_record_adopted(id, &mut tx).await? {
                    return Err(PaymentGatewayError::ItemNotFound(capture.item.clone()));
                }
                donors::link_donor_to_record(donor.id, id, capture.fee, &mut tx).await?;
            },
            ItemRef::Bond(code) => {
                if !items::mark_bond_purchased(code, &mut tx).await? {
                    return Err(PaymentGatewayError::ItemNotFound(capture.item.clone()));
                }
            },
        }
        let row = NewTransaction {
            provider_order_id: capture.order_id.clone(),
            item_id: capture.item.key(),
            donor_id: donor.id,
            fee: capture.fee,
            payment_status: PaymentStatus::Completed,
            payment_method: PAYMENT_METHOD.to_string(),
            pickup: capture.pickup,
        };
        let transaction = match transactions::insert_transaction(row, &mut tx).await {
            Ok(t) => t,
            Err(PaymentGatewayError::TransactionAlreadyExists(order_id)) => {
                // Lost a race against a concurrent capture of the same order. The winner's row is authoritative;
                // drop this unit of work and answer from the committed state.
                drop(tx);
                warn!("🗃️ Concurrent capture detected for order {order_id}. Returning the existing transaction.");
                let mut conn = self.pool.acquire().await?;
                let existing = transactions::fetch_by_order_id(&order_id, &mut conn)
                    .await?
                    .ok_or(PaymentGatewayError::TransactionAlreadyExists(order_id))?;
                return Ok((existing, false));
            },
            Err(e) => return Err(e),
        };
        tx.commit().await?;
        debug!(
            "🗃️ Capture of {} recorded: transaction #{} for donor #{} at {}",
            capture.item, transaction.id, donor.id, capture.fee
        );
        Ok((transaction, true))
    }
}
