//! # Archive payment server
//! This crate hosts the HTTP server for the archive society's donation gateway. It is responsible for:
//! * Accepting order-initiation requests from the storefront and relaying them to PayPal.
//! * Capturing completed PayPal orders into the local ledger (donors, transactions, item state).
//! * Serving the read-only catalog endpoints (records, bonds, donor history, transaction lookups).
//!
//! ## Configuration
//! The server is configured via environment variables, parsed once at startup. See [config](config/index.html)
//! for the full surface; missing required values fail startup rather than surfacing deep inside request handling.
//!
//! ## Routes
//! * `POST /create-order` and `POST /capture-order/{order_id}`: the purchase workflow.
//! * `GET /records`, `GET /records/{id}`, `GET /bonds`, `GET /bonds/{id}`, `GET /transactions/{order_id}`:
//!   read-only queries.
//! * `GET /health`: a health check route that returns a 200 OK response.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
