//! # Database and provider interface contracts.
//!
//! This module defines the traits that database backends and payment providers must implement to power the
//! archive payment engine.
//!
//! ## Traits
//! * [`PaymentGatewayDatabase`] defines the write side of the capture flow: the single atomic unit that records a
//!   verified purchase (donor resolution, item state change, transaction insert).
//! * [`CatalogManagement`] provides the read side: records, bonds, donors, and transaction lookups.
//! * [`PaymentProvider`] is the seam to the external payment service (order creation and status/payer retrieval).
//!   Handlers are generic over it so that tests can substitute a scripted provider without process-wide state.
mod catalog_management;
mod payment_gateway_database;
mod payment_provider;

pub use catalog_management::{CatalogApiError, CatalogManagement};
pub use payment_gateway_database::{PaymentGatewayDatabase, PaymentGatewayError};
pub use payment_provider::{PaymentProvider, PaymentProviderError, ProviderOrder, ProviderOrderStatus};
