//! Utility types shared across the crate.
//!
//! - [`Value`] / [`Dictionary`] - dynamically-typed metadata values
//! - [`Error`] / [`Result`] - error handling
//! - Math type re-exports from glam

mod error;
mod math;
mod value;

pub use error::*;
pub use math::*;
pub use value::*;
