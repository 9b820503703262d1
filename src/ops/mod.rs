//! Operations support.
//!
//! - [`telemetry`] - Structured logging setup

pub mod telemetry;
