use actix_web::{http::StatusCode, web, web::ServiceConfig};
use apg_common::UsdAmount;
use archive_payment_engine::{
    db_types::{Bond, BondStatus, Donor, HistoricalRecord},
    CatalogApi,
};
use chrono::{DateTime, TimeZone, Utc};

use super::{helpers::get_request, mocks::MockGatewayDatabase};
use crate::routes::{BondByIdRoute, BondsRoute, RecordByIdRoute, RecordsRoute, TransactionByOrderIdRoute};

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 9, 30, 0).unwrap()
}

fn sample_record() -> HistoricalRecord {
    HistoricalRecord {
        id: "9f4fbd28-3f66-4a57-b8f2-6c4d9a1b2c3d".into(),
        name: "Ledger of the Commissioners, 1811".into(),
        description: Some("Minutes and accounts of the street commissioners".into()),
        image_url: None,
        fee: UsdAmount::from_cents(7_500),
        adopted: false,
        adoption_date: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn sample_bond() -> Bond {
    Bond {
        bond_id: "BOND-001".into(),
        retail_price: UsdAmount::from_cents(10_000),
        par_value: Some("$1000".into()),
        issue_date: None,
        due_date: None,
        mayor: Some("Fernando Wood".into()),
        comptroller: Some("A. C. Flagg".into()),
        bond_type: Some("Municipal Bond".into()),
        purpose: None,
        front_image: None,
        back_image: None,
        status: BondStatus::Available,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn sample_donor() -> Donor {
    Donor {
        id: 7,
        name: "John Doe".into(),
        email: Some("john@example.com".into()),
        phone: None,
        shipping_street: None,
        shipping_apartment: None,
        shipping_city: None,
        shipping_state: None,
        shipping_zip_code: None,
        shipping_country: None,
        created_at: timestamp(),
        updated_at: timestamp(),
    }
}

fn configure(db: MockGatewayDatabase) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = CatalogApi::new(db);
        cfg.app_data(web::Data::new(api))
            .service(RecordsRoute::<MockGatewayDatabase>::new())
            .service(RecordByIdRoute::<MockGatewayDatabase>::new())
            .service(BondsRoute::<MockGatewayDatabase>::new())
            .service(BondByIdRoute::<MockGatewayDatabase>::new())
            .service(TransactionByOrderIdRoute::<MockGatewayDatabase>::new());
    }
}

#[actix_web::test]
async fn list_records() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_records().returning(|_| Ok(vec![sample_record()]));
    let (status, body) = get_request("/records", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed[0]["name"], "Ledger of the Commissioners, 1811");
    assert_eq!(parsed[0]["fee"], 75.0);
    assert_eq!(parsed[0]["adopted"], false);
}

#[actix_web::test]
async fn record_detail_includes_donor_names() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_record().returning(|_| Ok(Some(sample_record())));
    db.expect_fetch_donors_for_record().returning(|_| Ok(vec![sample_donor()]));
    let (status, body) =
        get_request("/records/9f4fbd28-3f66-4a57-b8f2-6c4d9a1b2c3d", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["donors"][0], "John Doe");
}

#[actix_web::test]
async fn record_detail_unknown_id_is_404() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_record().returning(|_| Ok(None));
    let (status, _body) = get_request("/records/9f4fbd28-3f66-4a57-b8f2-6c4d9a1b2c3d", configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn record_detail_malformed_id_is_400() {
    let _ = env_logger::try_init().ok();
    let db = MockGatewayDatabase::new();
    let (status, body) = get_request("/records/not-a-uuid", configure(db)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("not a record id"));
}

#[actix_web::test]
async fn bond_detail() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_bond().returning(|_| Ok(Some(sample_bond())));
    let (status, body) = get_request("/bonds/BOND-001", configure(db)).await;
    assert_eq!(status, StatusCode::OK);
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["bond_id"], "BOND-001");
    assert_eq!(parsed["retail_price"], 100.0);
    assert_eq!(parsed["status"], "available");
}

#[actix_web::test]
async fn transaction_lookup_unknown_order_is_404() {
    let _ = env_logger::try_init().ok();
    let mut db = MockGatewayDatabase::new();
    db.expect_fetch_transaction_by_order_id().returning(|_| Ok(None));
    let (status, body) = get_request("/transactions/GHOST-ORDER", configure(db)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("GHOST-ORDER"));
}
