//! Observability for livequery
//!
//! Structured logging for the query lifecycle. The core stays silent per
//! row; one event per completed scan is the contract, so logging cost
//! never scales with result size.

mod logger;

pub use logger::{Logger, Severity};
