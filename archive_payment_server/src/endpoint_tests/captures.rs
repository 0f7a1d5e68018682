use actix_web::{http::StatusCode, web, web::ServiceConfig};
use apg_common::UsdAmount;
use archive_payment_engine::{
    db_types::{ItemAvailability, OrderId, PayerDetails, PaymentStatus, Transaction},
    CaptureFlowApi,
    FeeSchedule,
    ProviderOrder,
    ProviderOrderStatus,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use super::{
    helpers::post_request,
    mocks::{MockGatewayDatabase, MockProvider},
};
use crate::{
    routes::{CaptureOrderRoute, CreateOrderRoute},
    server::json_error_config,
};

fn dollars(d: f64) -> UsdAmount {
    UsdAmount::try_from_dollars(d).unwrap()
}

fn sample_transaction() -> Transaction {
    Transaction {
        id: 42,
        provider_order_id: OrderId("TEST-ORDER-001".into()),
        item_id: "BOND-001".into(),
        donor_id: 7,
        fee: dollars(100.0),
        payment_status: PaymentStatus::Completed,
        payment_method: "PayPal".into(),
        pickup: true,
        created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn completed_details(amount: f64) -> ProviderOrder {
    ProviderOrder {
        order_id: OrderId("TEST-ORDER-001".into()),
        status: ProviderOrderStatus::Completed,
        amount: Some(dollars(amount)),
        payer: Some(PayerDetails::new("John Doe").with_email("john@example.com")),
    }
}

fn configure(db: MockGatewayDatabase, provider: MockProvider) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = CaptureFlowApi::new(db, provider, FeeSchedule::default());
        cfg.app_data(json_error_config())
            .app_data(web::Data::new(api))
            .service(CreateOrderRoute::<MockGatewayDatabase, MockProvider>::new())
            .service(CaptureOrderRoute::<MockGatewayDatabase, MockProvider>::new());
    }
}

#[actix_web::test]
async fn create_order_success() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_item_availability()
        .returning(|_| Ok(Some(ItemAvailability { price: UsdAmount::from_cents(10_000), available: true })));
    let mut provider = MockProvider::new();
    provider.expect_create_order().returning(|_, amount| {
        Ok(ProviderOrder {
            order_id: OrderId("TEST-ORDER-001".into()),
            status: ProviderOrderStatus::Created,
            amount: Some(amount),
            payer: None,
        })
    });
    let payload = json!({"item_id": "BOND-001", "fee": 100.0});
    let (status, body) = post_request("/create-order", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"id":"TEST-ORDER-001","status":"CREATED"}"#);
}

#[actix_web::test]
async fn create_order_unknown_item_is_404() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_item_availability().returning(|_| Ok(None));
    // No provider expectation: a validation failure must never reach the provider.
    let provider = MockProvider::new();
    let payload = json!({"item_id": "INVALID-BOND", "fee": 100.0});
    let (status, body) = post_request("/create-order", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("does not exist"));
}

#[actix_web::test]
async fn create_order_unavailable_item_is_400() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_item_availability()
        .returning(|_| Ok(Some(ItemAvailability { price: UsdAmount::from_cents(10_000), available: false })));
    let provider = MockProvider::new();
    let payload = json!({"item_id": "BOND-001", "fee": 100.0});
    let (status, body) = post_request("/create-order", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not available"));
}

#[actix_web::test]
async fn create_order_fee_mismatch_is_400() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_item_availability()
        .returning(|_| Ok(Some(ItemAvailability { price: UsdAmount::from_cents(10_000), available: true })));
    let provider = MockProvider::new();
    let payload = json!({"item_id": "BOND-001", "fee": 50.0});
    let (status, body) = post_request("/create-order", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("does not match"));
}

#[actix_web::test]
async fn create_order_negative_fee_is_400() {
    let _ = env_logger::try_init().ok();
    let db = MockGatewayDatabase::new();
    let provider = MockProvider::new();
    let payload = json!({"item_id": "BOND-001", "fee": -5.0});
    let (status, body) = post_request("/create-order", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("error"));
}

#[actix_web::test]
async fn capture_order_success() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(None));
    db.expect_record_capture()
        .withf(|capture| {
            capture.order_id.as_str() == "TEST-ORDER-001"
                && capture.item.key() == "BOND-001"
                && capture.fee == UsdAmount::from_cents(10_000)
                && capture.pickup
                && capture.payer.email.as_deref() == Some("john@example.com")
        })
        .returning(|_| Ok((sample_transaction(), true)));
    let mut provider = MockProvider::new();
    provider.expect_get_order_details().returning(|_| Ok(completed_details(100.0)));
    let payload = json!({"item_id": "BOND-001", "fee": 100.0, "pickup": true});
    let (status, body) = post_request("/capture-order/TEST-ORDER-001", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Success","transaction_id":42}"#);
}

#[actix_web::test]
async fn capture_order_replay_is_not_reprocessed() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(Some(sample_transaction())));
    // No provider or record_capture expectations: a replay must not contact the provider or write anything.
    let provider = MockProvider::new();
    let payload = json!({"item_id": "BOND-001", "fee": 100.0, "pickup": true});
    let (status, body) = post_request("/capture-order/TEST-ORDER-001", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"message":"Order already processed"}"#);
}

#[actix_web::test]
async fn capture_order_incomplete_is_400() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(None));
    let mut provider = MockProvider::new();
    provider.expect_get_order_details().returning(|_| {
        let mut details = completed_details(100.0);
        details.status = ProviderOrderStatus::Created;
        Ok(details)
    });
    let payload = json!({"item_id": "BOND-001", "fee": 100.0, "pickup": true});
    let (status, body) = post_request("/capture-order/TEST-ORDER-001", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not been completed"));
}

#[actix_web::test]
async fn capture_order_amount_mismatch_is_400() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(None));
    let mut provider = MockProvider::new();
    provider.expect_get_order_details().returning(|_| Ok(completed_details(105.0)));
    let payload = json!({"item_id": "BOND-001", "fee": 100.0, "pickup": false});
    let (status, body) = post_request("/capture-order/TEST-ORDER-001", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("captured"));
}

#[actix_web::test]
async fn capture_order_provider_unreachable_is_500() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(None));
    let mut provider = MockProvider::new();
    provider.expect_get_order_details().returning(|_| {
        Err(archive_payment_engine::PaymentProviderError::Unreachable("connection refused".to_string()))
    });
    let payload = json!({"item_id": "BOND-001", "fee": 100.0, "pickup": false});
    let (status, body) = post_request("/capture-order/TEST-ORDER-001", payload, configure(db, provider)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Payment processing error"));
}
