//! Bridges the standalone PayPal client into the engine's [`PaymentProvider`] seam.
//!
//! The engine deals in [`ProviderOrder`]s; this module converts PayPal's wire shapes into them, including the
//! payer-identity extraction that the capture flow treats as authoritative.
use archive_payment_engine::{
    ape_api::capture_flow_api::ANONYMOUS_DONOR_NAME,
    db_types::{ItemRef, OrderId, PayerDetails, ShippingAddress},
    PaymentProvider,
    PaymentProviderError,
    ProviderOrder,
    ProviderOrderStatus,
};
use apg_common::UsdAmount;
use log::trace;
use paypal_tools::{Address, PayPalApi, PayPalApiError, PayPalOrder};

#[derive(Clone)]
pub struct PayPalPaymentProvider {
    api: PayPalApi,
}

impl PayPalPaymentProvider {
    pub fn new(api: PayPalApi) -> Self {
        Self { api }
    }
}

impl PaymentProvider for PayPalPaymentProvider {
    async fn create_order(&self, item: &ItemRef, amount: UsdAmount) -> Result<ProviderOrder, PaymentProviderError> {
        let order = self.api.create_order(&item.key(), amount).await.map_err(provider_error)?;
        provider_order_from(order)
    }

    async fn get_order_details(&self, order_id: &OrderId) -> Result<ProviderOrder, PaymentProviderError> {
        let order = self.api.get_order_details(order_id.as_str()).await.map_err(provider_error)?;
        provider_order_from(order)
    }
}

fn provider_error(e: PayPalApiError) -> PaymentProviderError {
    match e {
        PayPalApiError::QueryError { status, message } => PaymentProviderError::RequestRejected { status, message },
        PayPalApiError::JsonError(m) | PayPalApiError::InvalidCurrencyAmount(m) => {
            PaymentProviderError::InvalidResponse(m)
        },
        e => PaymentProviderError::Unreachable(e.to_string()),
    }
}

/// Reduces a PayPal order to the engine's view of it. Status strings the engine does not know are carried through
/// as [`ProviderOrderStatus::Other`] rather than rejected.
pub fn provider_order_from(order: PayPalOrder) -> Result<ProviderOrder, PaymentProviderError> {
    trace!("💳️ Converting PayPal order to provider order: {order:?}");
    let status = order
        .status
        .parse::<ProviderOrderStatus>()
        .unwrap_or_else(|_| ProviderOrderStatus::Other(order.status.clone()));
    let amount = order
        .total()
        .map(|a| a.amount())
        .transpose()
        .map_err(|e| PaymentProviderError::InvalidResponse(e.to_string()))?;
    let address = order.shipping_address().map(shipping_address_from);
    let payer = order.payer.as_ref().map(|payer| PayerDetails {
        name: payer.full_name().unwrap_or_else(|| ANONYMOUS_DONOR_NAME.to_string()),
        email: payer.email_address.clone(),
        phone: payer.phone_number(),
        address: address.filter(|a| !a.is_empty()),
    });
    Ok(ProviderOrder { order_id: OrderId(order.id), status, amount, payer })
}

fn shipping_address_from(address: &Address) -> ShippingAddress {
    ShippingAddress {
        street: address.address_line_1.clone(),
        apartment: address.address_line_2.clone(),
        city: address.admin_area_2.clone(),
        state: address.admin_area_1.clone(),
        zip_code: address.postal_code.clone(),
        country: address.country_code.clone(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn converts_completed_order() {
        let order: PayPalOrder = serde_json::from_value(serde_json::json!({
            "id": "TEST-ORDER-001",
            "status": "COMPLETED",
            "payer": {
                "name": {"given_name": "Jane", "surname": "Smith"},
                "email_address": "jane@example.com",
                "phone": {"phone_number": {"national_number": "1234567890"}}
            },
            "purchase_units": [{
                "amount": {"value": "105.00"},
                "shipping": {"address": {
                    "address_line_1": "456 Broadway",
                    "admin_area_2": "Los Angeles",
                    "admin_area_1": "CA",
                    "postal_code": "90001",
                    "country_code": "US"
                }}
            }]
        }))
        .unwrap();
        let converted = provider_order_from(order).unwrap();
        assert_eq!(converted.order_id.as_str(), "TEST-ORDER-001");
        assert_eq!(converted.status, ProviderOrderStatus::Completed);
        assert_eq!(converted.amount.unwrap().value(), 10_500);
        let payer = converted.payer.unwrap();
        assert_eq!(payer.name, "Jane Smith");
        assert_eq!(payer.email.as_deref(), Some("jane@example.com"));
        assert_eq!(payer.phone.as_deref(), Some("1234567890"));
        let address = payer.address.unwrap();
        assert_eq!(address.street.as_deref(), Some("456 Broadway"));
        assert_eq!(address.city.as_deref(), Some("Los Angeles"));
        assert_eq!(address.state.as_deref(), Some("CA"));
        assert_eq!(address.zip_code.as_deref(), Some("90001"));
        assert_eq!(address.country.as_deref(), Some("US"));
    }

    #[test]
    fn converts_bare_created_order() {
        let order: PayPalOrder =
            serde_json::from_value(serde_json::json!({"id": "TEST-ORDER-002", "status": "CREATED"})).unwrap();
        let converted = provider_order_from(order).unwrap();
        assert_eq!(converted.status, ProviderOrderStatus::Created);
        assert!(converted.amount.is_none());
        assert!(converted.payer.is_none());
    }

    #[test]
    fn nameless_payer_becomes_anonymous() {
        let order: PayPalOrder = serde_json::from_value(serde_json::json!({
            "id": "TEST-ORDER-003",
            "status": "COMPLETED",
            "payer": {"email_address": "ghost@example.com"},
            "purchase_units": [{"amount": {"value": "100.00"}}]
        }))
        .unwrap();
        let converted = provider_order_from(order).unwrap();
        let payer = converted.payer.unwrap();
        assert_eq!(payer.name, ANONYMOUS_DONOR_NAME);
        assert!(payer.address.is_none());
    }

    #[test]
    fn unknown_status_is_carried_through() {
        let order: PayPalOrder =
            serde_json::from_value(serde_json::json!({"id": "TEST-ORDER-004", "status": "PAYER_ACTION_REQUIRED"}))
                .unwrap();
        let converted = provider_order_from(order).unwrap();
        assert_eq!(converted.status, ProviderOrderStatus::Other("PAYER_ACTION_REQUIRED".to_string()));
    }
}
