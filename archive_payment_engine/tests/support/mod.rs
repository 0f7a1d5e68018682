//! A scripted in-memory payment provider for exercising the capture flow without any network traffic.
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use apg_common::UsdAmount;
use archive_payment_engine::{
    db_types::{ItemRef, OrderId, PayerDetails, ShippingAddress},
    PaymentProvider,
    PaymentProviderError,
    ProviderOrder,
    ProviderOrderStatus,
};

#[derive(Clone, Default)]
pub struct TestProvider {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    orders: HashMap<String, ProviderOrder>,
    create_calls: u64,
    next_id: u64,
}

impl TestProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the response `get_order_details` will return for the order's id.
    pub fn add_order(&self, order: ProviderOrder) {
        let mut inner = self.inner.lock().unwrap();
        inner.orders.insert(order.order_id.as_str().to_string(), order);
    }

    pub fn create_calls(&self) -> u64 {
        self.inner.lock().unwrap().create_calls
    }
}

impl PaymentProvider for TestProvider {
    async fn create_order(&self, _item: &ItemRef, amount: UsdAmount) -> Result<ProviderOrder, PaymentProviderError> {
        let mut inner = self.inner.lock().unwrap();
        inner.create_calls += 1;
        inner.next_id += 1;
        let order_id = OrderId(format!("TEST-ORDER-{:03}", inner.next_id));
        let order = ProviderOrder {
            order_id: order_id.clone(),
            status: ProviderOrderStatus::Created,
            amount: Some(amount),
            payer: None,
        };
        inner.orders.insert(order_id.as_str().to_string(), order.clone());
        Ok(order)
    }

    async fn get_order_details(&self, order_id: &OrderId) -> Result<ProviderOrder, PaymentProviderError> {
        let inner = self.inner.lock().unwrap();
        inner.orders.get(order_id.as_str()).cloned().ok_or(PaymentProviderError::RequestRejected {
            status: 404,
            message: format!("Order {order_id} not found"),
        })
    }
}

pub fn completed_order(order_id: &str, amount: UsdAmount, payer: PayerDetails) -> ProviderOrder {
    ProviderOrder {
        order_id: OrderId(order_id.to_string()),
        status: ProviderOrderStatus::Completed,
        amount: Some(amount),
        payer: Some(payer),
    }
}

pub fn john_doe() -> PayerDetails {
    PayerDetails::new("John Doe").with_email("john@example.com").with_address(us_address("123 Main St", "New York"))
}

pub fn us_address(street: &str, city: &str) -> ShippingAddress {
    ShippingAddress {
        street: Some(street.to_string()),
        apartment: None,
        city: Some(city.to_string()),
        state: Some("NY".to_string()),
        zip_code: Some("10001".to_string()),
        country: Some("US".to_string()),
    }
}
