//! Archive Payment Engine
//!
//! The archive payment engine is the core of the donation gateway for the historical archive society's shop. It is
//! web-framework agnostic and payment-provider agnostic. The library is divided into three main sections:
//!
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly; use the public API instead. The exception is the data types used in the
//!    database, which are defined in the [`db_types`] module and are public.
//! 2. The interface contracts ([`mod@traits`]) that a database backend and a payment provider need to implement in
//!    order to power the engine.
//! 3. The engine's public API ([`mod@ape_api`]): the order initiation / capture workflow and the read-only catalog
//!    queries.
pub mod ape_api;
pub mod db_types;
pub mod helpers;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use ape_api::{
    capture_flow_api::CaptureFlowApi,
    catalog_api::CatalogApi,
    errors::CaptureFlowError,
    CaptureRequest,
    CaptureResult,
    FeeSchedule,
};
pub use traits::{
    CatalogApiError,
    CatalogManagement,
    PaymentGatewayDatabase,
    PaymentGatewayError,
    PaymentProvider,
    PaymentProviderError,
    ProviderOrder,
    ProviderOrderStatus,
};
