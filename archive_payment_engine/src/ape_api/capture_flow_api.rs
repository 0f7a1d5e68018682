use std::fmt::Debug;

use apg_common::UsdAmount;
use log::*;

use crate::{
    ape_api::{
        capture_objects::{CaptureRequest, CaptureResult, FeeSchedule},
        errors::CaptureFlowError,
    },
    db_types::{ItemRef, NewCapture, PayerDetails},
    traits::{PaymentGatewayDatabase, PaymentGatewayError, PaymentProvider, ProviderOrder, ProviderOrderStatus},
};

/// The name recorded for payers whose identity the provider did not report.
pub const ANONYMOUS_DONOR_NAME: &str = "Anonymous";

/// `CaptureFlowApi` is the primary API for the purchase workflow: initiating a provider order for an item, and
/// capturing a completed order into the local ledger.
pub struct CaptureFlowApi<B, P> {
    db: B,
    provider: P,
    fees: FeeSchedule,
}

impl<B, P> Debug for CaptureFlowApi<B, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CaptureFlowApi")
    }
}

impl<B, P> CaptureFlowApi<B, P> {
    pub fn new(db: B, provider: P, fees: FeeSchedule) -> Self {
        Self { db, provider, fees }
    }
}

impl<B, P> CaptureFlowApi<B, P>
where
    B: PaymentGatewayDatabase,
    P: PaymentProvider,
{
    /// Initiates a provider order for the given item.
    ///
    /// The item must exist, be available, and the fee must be a legitimate total for the item's configured price
    /// (see [`FeeSchedule`]). Only then is the provider asked to create an order; its response is returned
    /// unmodified. This step writes nothing locally, so a buyer abandoning the checkout leaves no trace.
    pub async fn initiate_order(&self, item: &ItemRef, fee: UsdAmount) -> Result<ProviderOrder, CaptureFlowError> {
        let availability = self
            .db
            .fetch_item_availability(item)
            .await?
            .ok_or_else(|| CaptureFlowError::ItemNotFound(item.clone()))?;
        if !availability.available {
            debug!("🏛️ Rejecting order initiation: {item} is no longer available");
            return Err(CaptureFlowError::ItemUnavailable(item.clone()));
        }
        if !self.fees.fee_is_valid(item, availability.price, fee) {
            debug!("🏛️ Rejecting order initiation for {item}: fee {fee} does not match price {}", availability.price);
            return Err(CaptureFlowError::FeeMismatch { submitted: fee, price: availability.price });
        }
        let order = self.provider.create_order(item, fee).await?;
        info!("🏛️ Provider order {} created for {item} at {fee}", order.order_id);
        Ok(order)
    }

    /// Captures a completed provider order into the local ledger.
    ///
    /// The sequence is:
    /// 1. Idempotency check: an order id that has already been processed returns `AlreadyProcessed` immediately,
    ///    without contacting the provider again.
    /// 2. The order's status is verified with the provider. Anything other than `COMPLETED` fails the capture; a
    ///    transaction is never created for an incomplete order.
    /// 3. The client-asserted fee is reconciled against the provider's captured amount. The provider is
    ///    authoritative; a mismatch fails the capture.
    /// 4. Payer identity is taken from the provider payload and the whole purchase is recorded in one atomic
    ///    database transaction (see [`PaymentGatewayDatabase::record_capture`]).
    ///
    /// Nothing is written locally unless step 4 commits.
    pub async fn capture_order(&self, request: CaptureRequest) -> Result<CaptureResult, CaptureFlowError> {
        if let Some(existing) = self.db.fetch_transaction_by_order_id(&request.order_id).await? {
            info!("🏛️ Order {} has already been processed as transaction #{}", request.order_id, existing.id);
            return Ok(CaptureResult::AlreadyProcessed(existing));
        }
        let details = self.provider.get_order_details(&request.order_id).await?;
        if details.status != ProviderOrderStatus::Completed {
            warn!("🏛️ Refusing to capture order {}: provider reports status {}", request.order_id, details.status);
            return Err(CaptureFlowError::OrderNotCompleted(request.order_id, details.status.to_string()));
        }
        let captured = details.amount.ok_or_else(|| CaptureFlowError::MissingCapturedAmount(request.order_id.clone()))?;
        if captured != request.fee {
            warn!(
                "🏛️ Refusing to capture order {}: client asserted {} but the provider captured {captured}",
                request.order_id, request.fee
            );
            return Err(CaptureFlowError::CapturedAmountMismatch { submitted: request.fee, captured });
        }
        let payer = details.payer.unwrap_or_else(|| {
            warn!("🏛️ Provider reported no payer for completed order {}. Recording as anonymous.", request.order_id);
            PayerDetails::new(ANONYMOUS_DONOR_NAME)
        });
        let capture = NewCapture {
            order_id: request.order_id.clone(),
            item: request.item,
            fee: captured,
            pickup: request.pickup,
            payer,
        };
        let (transaction, inserted) = self.db.record_capture(capture).await.map_err(|e| match e {
            PaymentGatewayError::ItemNotFound(item) => CaptureFlowError::ItemNotFound(item),
            e => CaptureFlowError::DatabaseError(e),
        })?;
        if inserted {
            info!("🏛️ Order {} captured as transaction #{}", request.order_id, transaction.id);
            Ok(CaptureResult::Recorded(transaction))
        } else {
            info!("🏛️ Order {} was captured concurrently as transaction #{}", request.order_id, transaction.id);
            Ok(CaptureResult::AlreadyProcessed(transaction))
        }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}
