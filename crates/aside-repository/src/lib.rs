//! # Aside Repository
//!
//! Origin store access for user records.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository>
//! SqlUserRepository
//!   ↓  DatabasePool (sqlx AnyPool)
//! MySQL / SQLite
//! ```

pub mod pool;
pub mod sql;
pub mod traits;

pub use pool::*;
pub use sql::*;
pub use traits::*;
