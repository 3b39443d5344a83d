//! # Aside REST
//!
//! HTTP layer using Axum: the user read/write endpoints, health probes and
//! the Prometheus scrape endpoint.

pub mod controllers;
pub mod middleware;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
