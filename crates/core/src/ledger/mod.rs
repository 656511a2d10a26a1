//! Product ledger.
//!
//! The ledger is the working set of product rows touched by one purchase or sale
//! operation. Products are loaded into it, stock and price mutations are applied
//! line by line, and the net result is read back with
//! [`ProductLedger::changes`] for persistence inside the same transaction.

pub mod book;
pub mod types;

#[cfg(test)]
mod book_props;

pub use book::ProductLedger;
pub use types::{LedgerChange, PriceUpdate, ProductState};
