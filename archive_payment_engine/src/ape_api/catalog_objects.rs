use serde::{Deserialize, Serialize};

use crate::db_types::{BondStatus, Donor, HistoricalRecord, Transaction};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordQueryFilter {
    pub adopted: Option<bool>,
}

impl RecordQueryFilter {
    pub fn with_adopted(mut self, adopted: bool) -> Self {
        self.adopted = Some(adopted);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.adopted.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BondQueryFilter {
    pub status: Option<BondStatus>,
}

impl BondQueryFilter {
    pub fn with_status(mut self, status: BondStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
    }
}

/// A historical record together with the names of the donors that adopted it, as shown on the record detail page.
#[derive(Debug, Clone, Serialize)]
pub struct RecordDetail {
    #[serde(flatten)]
    pub record: HistoricalRecord,
    pub donors: Vec<String>,
}

/// A donor and their purchase history, newest transaction first.
#[derive(Debug, Clone, Serialize)]
pub struct DonorHistory {
    pub donor: Donor,
    pub transactions: Vec<Transaction>,
}
