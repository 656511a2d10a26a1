//! Shared configuration, errors, and notification seams for Tendero.
//!
//! This crate provides common pieces used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - The post-commit notification seam (`Notifier`) and its receipts
//! - SMTP email delivery of receipts

pub mod config;
pub mod email;
pub mod error;
pub mod notify;

pub use config::{AppConfig, EmailConfig, InventoryConfig};
pub use email::{EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use notify::{
    NoopNotifier, Notifier, NotifyError, PurchaseReceipt, ReceiptLine, SaleReceipt,
};
