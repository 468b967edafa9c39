//! Measure the primitives of a symmetric pairing group and feed them into
//! closed-form cost models of aggregate signature schemes.

pub mod config;
pub mod cost;
pub mod curve;
pub mod error;
pub mod field;
mod modular;
pub mod pairing;
pub mod params;
pub mod provider;
pub mod report;
pub mod timing;

pub use error::{Error, Result};
