//! Core business logic for Tendero.
//!
//! This crate contains pure inventory logic with ZERO web or database dependencies.
//! The database crate loads rows into these types, runs the engines, and persists
//! what they decide.
//!
//! # Modules
//!
//! - `units` - Unit conversion between presentations and base units
//! - `pricing` - Margin normalization and COP price rounding
//! - `ledger` - Per-operation product stock and price working set
//! - `consolidation` - Merging of duplicate (product, presentation) lines
//! - `purchase` - Purchase validation, application, and cancellation planning
//! - `sale` - Sale state machine, pricing, and stock planning
//! - `error` - Inventory error taxonomy

pub mod consolidation;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod purchase;
pub mod sale;
pub mod units;

pub use error::{ErrorKind, InventoryError};
