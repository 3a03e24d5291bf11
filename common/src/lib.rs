//! Cambio Common Types
//!
//! Value types shared across Cambio: currencies, monetary amounts,
//! exchange rates and rounding modes.

pub mod error;
pub mod monetary;
pub mod rate;
pub mod rounding;

pub use error::*;
pub use monetary::*;
pub use rate::*;
pub use rounding::*;
