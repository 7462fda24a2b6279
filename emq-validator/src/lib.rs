//! Request validation for the EMQ client
//!
//! Rejects malformed requests locally, before they cost a round trip:
//! - Queue name and prefix grammar
//! - Required and non-empty fields
//! - Numeric attribute ranges from the service contract
//! - Unique entry keys within batch requests

pub mod checks;
pub mod client;
pub mod request;
mod validator;


pub use client::{ClientError, QueueClient, Transport};
pub use emq_core::{FieldRange, RangeKey, RangeTable, ValidationError};
pub use request::*;
pub use validator::RequestValidator;
