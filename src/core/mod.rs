//! Core infrastructure.
//!
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Error types and canonical status mapping

pub mod config;
pub mod error;
