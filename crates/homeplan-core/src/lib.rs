//! Mortgage affordability and home-purchase planning engine.
//!
//! Every calculation is a pure function over `rust_decimal::Decimal` inputs:
//! no I/O, no wall clock, no shared state. Callers that need "today" pass it
//! in explicitly.

pub mod calendar;
pub mod error;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "property_tax")]
pub mod property_tax;

#[cfg(feature = "affordability")]
pub mod affordability;

#[cfg(feature = "costs")]
pub mod costs;

#[cfg(feature = "savings")]
pub mod savings;

#[cfg(feature = "plan")]
pub mod plan;

pub use error::HomeplanError;
pub use types::*;

/// Standard result type for all homeplan operations
pub type HomeplanResult<T> = Result<T, HomeplanError>;
