//! # Aside Service
//!
//! Cache backends and the cache-aside user accessor.

pub mod cache;
pub mod metrics;
pub mod r#impl;
pub mod user_service;

pub use cache::*;
pub use self::metrics::register_metrics;
pub use r#impl::*;
pub use user_service::*;
