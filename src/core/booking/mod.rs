//! Booking Creation Wizard
//!
//! Sequences booking creation through three fixed steps, owning the draft
//! and gating forward transitions on validation:
//! 1. Routing - booking identity, pickup and delivery details
//! 2. Shipment - container/load details and charge selection
//! 3. Assignment - driver selection and final submission
//!
//! # Design Principles
//!
//! - **Single writer**: only the controller mutates the draft, from
//!   synchronous UI callbacks
//! - **Validated advancement**: step 1 requires the routing fields, step 3
//!   requires a driver; step 2 advances unvalidated
//! - **Terminal submission**: a submitted wizard accepts no further mutation
//! - **Persistence**: in-progress drafts survive restarts via SQLite and can
//!   be resumed
//! - **Degraded estimates**: missing rate tables cost zero instead of
//!   blocking the user

mod types;
mod controller;
mod estimate;
mod manager;

pub use types::*;
pub use controller::*;
pub use estimate::*;
pub use manager::*;
