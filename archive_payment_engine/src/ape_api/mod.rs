//! # Archive payment engine API
//!
//! The `ape_api` module exposes the programmatic API for the archive payment engine. The API is modular, so that
//! clients can pick the functionality they need:
//!
//! * [`CaptureFlowApi`](capture_flow_api::CaptureFlowApi) drives the order initiation and capture workflow against
//!   a database backend and a payment provider.
//! * [`CatalogApi`](catalog_api::CatalogApi) serves the read-only storefront queries (records, bonds, donor
//!   history, transaction lookups).
//!
//! The other submodules hold the request/response objects and error types for these APIs.
pub mod capture_flow_api;
pub mod capture_objects;
pub mod catalog_api;
pub mod catalog_objects;
pub mod errors;

pub use capture_objects::{CaptureRequest, CaptureResult, FeeSchedule};
pub use catalog_objects::{BondQueryFilter, DonorHistory, RecordDetail, RecordQueryFilter};
