use std::time::Duration;

use actix_web::{dev::Server, error::JsonPayloadError, http::KeepAlive, middleware::Logger, web, App, HttpRequest, HttpServer};
use archive_payment_engine::{CaptureFlowApi, CatalogApi, SqliteDatabase};
use log::info;
use paypal_tools::PayPalApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    integrations::paypal::PayPalPaymentProvider,
    routes::{
        health,
        BondByIdRoute,
        BondsRoute,
        CaptureOrderRoute,
        CreateOrderRoute,
        RecordByIdRoute,
        RecordsRoute,
        TransactionByOrderIdRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let api = PayPalApi::new(config.paypal.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let provider = PayPalPaymentProvider::new(api);
    info!("🚀️ Database and payment provider initialised");
    let srv = create_server_instance(config, db, provider)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    provider: PayPalPaymentProvider,
) -> Result<Server, ServerError> {
    let srv = HttpServer::new(move || {
        let capture_api = CaptureFlowApi::new(db.clone(), provider.clone(), config.fees);
        let catalog_api = CatalogApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("apg::access_log"))
            .app_data(json_error_config())
            .app_data(web::Data::new(capture_api))
            .app_data(web::Data::new(catalog_api))
            .service(health)
            .service(CreateOrderRoute::<SqliteDatabase, PayPalPaymentProvider>::new())
            .service(CaptureOrderRoute::<SqliteDatabase, PayPalPaymentProvider>::new())
            .service(RecordsRoute::<SqliteDatabase>::new())
            .service(RecordByIdRoute::<SqliteDatabase>::new())
            .service(BondsRoute::<SqliteDatabase>::new())
            .service(BondByIdRoute::<SqliteDatabase>::new())
            .service(TransactionByOrderIdRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Renders malformed JSON bodies with the same `{"error": ...}` shape the rest of the error taxonomy uses.
pub fn json_error_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| ServerError::InvalidRequestBody(err.to_string()).into())
}
