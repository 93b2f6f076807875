//! Freightdesk - Logistics Booking Core
//!
//! Core library providing the booking-creation wizard, cost estimation,
//! rate-table access, and dispatch plumbing for logistics operations.

pub mod config;
pub mod core;
pub mod database;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
