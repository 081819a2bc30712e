//! HTTP server for the odometer reading ledger.
//!
//! Exposes the registry operations over a small JSON API: a generic
//! `POST /v1/invoke` endpoint taking an operation name and positional
//! arguments, plus read-only `GET` routes for readings.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::{ErrorBody, InvokeRequest};
pub use server::OdoServer;
