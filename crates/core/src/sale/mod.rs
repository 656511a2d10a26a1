//! Sale transaction engine.
//!
//! Direct sales (`VENTA_DIRECTA`) deduct stock at creation and start COMPLETADA.
//! Mobile orders (`PEDIDO_MOVIL`) start PENDIENTE with stock untouched and deduct
//! it on confirmation. Cancelling gives stock back only when it had been taken.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::SaleService;
pub use types::{
    ClientRef, CreateSaleInput, PricedSaleLine, RecordedSaleLine, SaleCancellation, SaleLine,
    SaleLineInput, SaleStatus, SaleType, ValidatedSale,
};
