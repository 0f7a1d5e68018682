use apg_common::UsdAmount;
use serde::{Deserialize, Serialize};

use crate::db_types::{ItemRef, OrderId, Transaction};

//--------------------------------------    CaptureRequest     -------------------------------------------------------
/// A client's request to capture a previously created provider order. The fee and pickup flag are client-asserted;
/// the fee is reconciled against the provider's captured amount before anything is recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureRequest {
    pub order_id: OrderId,
    pub item: ItemRef,
    pub fee: UsdAmount,
    pub pickup: bool,
}

//--------------------------------------     CaptureResult     -------------------------------------------------------
/// The outcome of a capture call. Replays of an already-processed order id succeed with `AlreadyProcessed` so the
/// client-side flow stays simple on retries.
#[derive(Debug, Clone)]
pub enum CaptureResult {
    Recorded(Transaction),
    AlreadyProcessed(Transaction),
}

impl CaptureResult {
    pub fn transaction(&self) -> &Transaction {
        match self {
            CaptureResult::Recorded(t) | CaptureResult::AlreadyProcessed(t) => t,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, CaptureResult::Recorded(_))
    }
}

//--------------------------------------      FeeSchedule      -------------------------------------------------------
/// The shipping surcharge schedule for bonds.
///
/// A bond can be picked up (no surcharge), shipped domestically (handling surcharge), or shipped internationally
/// (handling plus international surcharge), so three totals are legitimate for a bond priced `P`. Historical-record
/// adoptions are sponsorships with nothing shipped; their fee must equal the record fee exactly.
#[derive(Debug, Clone, Copy)]
pub struct FeeSchedule {
    pub handling: UsdAmount,
    pub international: UsdAmount,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self { handling: UsdAmount::from_cents(500), international: UsdAmount::from_cents(2_000) }
    }
}

impl FeeSchedule {
    /// Whether `fee` is a legitimate total for an item of this kind priced at `price`.
    pub fn fee_is_valid(&self, item: &ItemRef, price: UsdAmount, fee: UsdAmount) -> bool {
        match item {
            ItemRef::Record(_) => fee == price,
            ItemRef::Bond(_) => {
                fee == price || fee == price + self.handling || fee == price + self.handling + self.international
            },
        }
    }
}
