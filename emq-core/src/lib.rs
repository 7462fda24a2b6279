//! Core types for the EMQ client
//!
//! This crate provides the error kind and the service range table used by
//! the request validator and the command-line tool.

pub mod error;
pub mod range;

pub use error::{Result, ValidationError};
pub use range::{FieldRange, RangeKey, RangeOverride, RangeTable};
