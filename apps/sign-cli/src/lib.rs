//! Command-line signing
//!
//! Loads a PDF, places signature and stamp images by preset or placement
//! plan, and sends the result through the remote signing service.

pub mod client;
pub mod config;
pub mod image;
pub mod plan;

pub use client::HttpSigningService;
pub use config::ServiceConfig;
pub use plan::{PlacementPlan, PlannedPlacement};
