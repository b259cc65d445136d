//! Database module for PostgreSQL persistence.

mod items;
mod pool;
mod products;

pub use items::*;
pub use pool::*;
pub use products::*;
