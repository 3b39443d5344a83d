//! # Aside Server Library
//!
//! Wiring for the Aside server: builds the store, cache and HTTP layers
//! from configuration and runs them.

pub mod app;
pub mod startup;
