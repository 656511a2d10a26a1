//! Purchase transaction engine.
//!
//! A purchase adds stock for every consolidated line, resets the product cost
//! to the line's per-base-unit cost, and recomputes the sale price from the
//! product margin. Each line keeps a snapshot of the prices it replaced so a
//! void within the allowed window can restore them.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{PURCHASE_DATE_FORMAT, PurchaseService};
pub use types::{
    AppliedPurchaseLine, CreatePurchaseInput, PurchaseLine, PurchaseLineInput, PurchaseStatus,
    RecordedPurchaseLine, ValidatedPurchase,
};
