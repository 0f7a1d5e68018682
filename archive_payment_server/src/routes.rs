//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. All outbound calls here (database, payment provider) are
//! futures, so worker threads keep serving other requests while a capture waits on PayPal.
use std::str::FromStr;

use actix_web::{get, web, HttpResponse, Responder};
use archive_payment_engine::{
    ape_api::{BondQueryFilter, RecordQueryFilter},
    db_types::OrderId,
    CaptureFlowApi,
    CaptureRequest,
    CaptureResult,
    CatalogApi,
    CatalogManagement,
    PaymentGatewayDatabase,
    PaymentProvider,
};
use log::*;
use uuid::Uuid;

use crate::{
    data_objects::{CaptureOrderRequest, CaptureOrderResponse, CreateOrderRequest, OrderCreatedResponse},
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------  Checkout  ----------------------------------------------------
route!(create_order => Post "/create-order" impl PaymentGatewayDatabase, PaymentProvider);
/// Route handler for initiating a provider order.
///
/// The storefront posts the item id and the total it is asking the buyer to pay. The item must exist, be
/// available, and the total must match the item's price (plus a legitimate shipping surcharge for bonds). The
/// provider's order id and status are returned unmodified; nothing is written locally.
pub async fn create_order<B, P>(
    body: web::Json<CreateOrderRequest>,
    api: web::Data<CaptureFlowApi<B, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    P: PaymentProvider,
{
    let CreateOrderRequest { item_id, fee } = body.into_inner();
    debug!("💻️ POST create-order for {item_id} at {fee}");
    if !fee.is_positive() {
        return Err(ServerError::ValidationError("Fee must be a positive amount".to_string()));
    }
    let order = api.initiate_order(&item_id, fee).await?;
    Ok(HttpResponse::Ok().json(OrderCreatedResponse::from(order)))
}

route!(capture_order => Post "/capture-order/{order_id}" impl PaymentGatewayDatabase, PaymentProvider);
/// Route handler for capturing a completed provider order.
///
/// Replays of an already-captured order id return 200 with an "Order already processed" message, so storefront
/// retries need no special handling. Payer identity is taken from the provider, never from this request body.
pub async fn capture_order<B, P>(
    path: web::Path<String>,
    body: web::Json<CaptureOrderRequest>,
    api: web::Data<CaptureFlowApi<B, P>>,
) -> Result<HttpResponse, ServerError>
where
    B: PaymentGatewayDatabase,
    P: PaymentProvider,
{
    let order_id = OrderId(path.into_inner());
    let CaptureOrderRequest { item_id, fee, pickup } = body.into_inner();
    debug!("💻️ POST capture-order for order {order_id} ({item_id}, {fee}, pickup: {pickup})");
    if !fee.is_positive() {
        return Err(ServerError::ValidationError("Fee must be a positive amount".to_string()));
    }
    let request = CaptureRequest { order_id, item: item_id, fee, pickup };
    let response = match api.capture_order(request).await? {
        CaptureResult::Recorded(transaction) => CaptureOrderResponse::success(transaction.id),
        CaptureResult::AlreadyProcessed(_) => CaptureOrderResponse::already_processed(),
    };
    Ok(HttpResponse::Ok().json(response))
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(records => Get "/records" impl CatalogManagement);
pub async fn records<B: CatalogManagement>(
    query: web::Query<RecordQueryFilter>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET records");
    let records = api.records(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(records))
}

route!(record_by_id => Get "/records/{id}" impl CatalogManagement);
pub async fn record_by_id<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    let id = Uuid::from_str(&id).map_err(|e| ServerError::InvalidRequestPath(format!("{id} is not a record id. {e}")))?;
    debug!("💻️ GET record {id}");
    let detail = api.record_detail(&id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Record {id}")))?;
    Ok(HttpResponse::Ok().json(detail))
}

route!(bonds => Get "/bonds" impl CatalogManagement);
pub async fn bonds<B: CatalogManagement>(
    query: web::Query<BondQueryFilter>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ GET bonds");
    let bonds = api.bonds(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bonds))
}

route!(bond_by_id => Get "/bonds/{id}" impl CatalogManagement);
pub async fn bond_by_id<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let id = path.into_inner();
    debug!("💻️ GET bond {id}");
    let bond = api.bond(&id).await?.ok_or_else(|| ServerError::NoRecordFound(format!("Bond {id}")))?;
    Ok(HttpResponse::Ok().json(bond))
}

route!(transaction_by_order_id => Get "/transactions/{order_id}" impl CatalogManagement);
pub async fn transaction_by_order_id<B: CatalogManagement>(
    path: web::Path<String>,
    api: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let order_id = OrderId(path.into_inner());
    debug!("💻️ GET transaction for order {order_id}");
    let transaction = api
        .transaction_by_order_id(&order_id)
        .await?
        .ok_or_else(|| ServerError::NoRecordFound(format!("Transaction for order {order_id}")))?;
    Ok(HttpResponse::Ok().json(transaction))
}
