//! # Aside Core
//!
//! Core types and error definitions for the Aside cache-aside service.
//! Every other crate in the workspace speaks in terms of [`AsideError`]
//! and [`AsideResult`].

pub mod error;
pub mod health;
pub mod id;
pub mod result;
pub mod timeout;

pub use error::*;
pub use health::*;
pub use id::*;
pub use result::*;
pub use timeout::*;
