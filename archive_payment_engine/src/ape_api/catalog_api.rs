//! Unified API for the read-only storefront queries.

use std::fmt::Debug;

use log::trace;
use uuid::Uuid;

use crate::{
    ape_api::catalog_objects::{BondQueryFilter, DonorHistory, RecordDetail, RecordQueryFilter},
    db_types::{Bond, HistoricalRecord, OrderId, Transaction},
    traits::{CatalogApiError, CatalogManagement},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub async fn records(&self, filter: RecordQueryFilter) -> Result<Vec<HistoricalRecord>, CatalogApiError> {
        self.db.fetch_records(filter).await
    }

    /// Fetches a record together with the names of the donors that adopted it. `None` if no such record exists.
    pub async fn record_detail(&self, id: &Uuid) -> Result<Option<RecordDetail>, CatalogApiError> {
        let record = match self.db.fetch_record(id).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let donors = self.db.fetch_donors_for_record(id).await?;
        trace!("Record {id} has {} donors", donors.len());
        let donors = donors.into_iter().map(|d| d.name).collect();
        Ok(Some(RecordDetail { record, donors }))
    }

    pub async fn bonds(&self, filter: BondQueryFilter) -> Result<Vec<Bond>, CatalogApiError> {
        self.db.fetch_bonds(filter).await
    }

    pub async fn bond(&self, bond_id: &str) -> Result<Option<Bond>, CatalogApiError> {
        self.db.fetch_bond(bond_id).await
    }

    pub async fn transaction_by_order_id(&self, order_id: &OrderId) -> Result<Option<Transaction>, CatalogApiError> {
        self.db.fetch_transaction_by_order_id(order_id).await
    }

    /// Fetches a donor's purchase history by email (case-insensitive). `None` if no donor matches.
    pub async fn donor_history(&self, email: &str) -> Result<Option<DonorHistory>, CatalogApiError> {
        let donor = match self.db.fetch_donor_by_email(email).await? {
            Some(d) => d,
            None => return Ok(None),
        };
        let transactions = self.db.fetch_transactions_for_donor(donor.id).await?;
        Ok(Some(DonorHistory { donor, transactions }))
    }
}
