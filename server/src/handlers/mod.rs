//! Request handlers for collection and catalog endpoints.

mod items;
mod products;

pub use items::*;
pub use products::*;
