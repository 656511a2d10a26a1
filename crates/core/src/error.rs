//! Inventory engine error types.
//!
//! Every failure the purchase and sale engines can report lives here, grouped by
//! the family a caller needs in order to react: malformed input, missing
//! entities, conflicting state, violated business rules, and internal failures.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use tendero_shared::AppError;

use crate::sale::SaleStatus;

/// Error family, surfaced to callers as `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, detected before any mutation.
    Validation,
    /// A referenced entity does not exist.
    NotFound,
    /// Duplicate business number, already-void record, invalid transition.
    Conflict,
    /// Stock, activity, margin, and age rules.
    BusinessRule,
    /// Persistence or transport failure.
    Internal,
}

/// Errors that can occur during inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    // ========== Validation Errors ==========
    /// A required field is absent or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A field is present but malformed or out of range.
    #[error("Invalid field {field}: {reason}")]
    InvalidField {
        /// Field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// A purchase or sale must carry at least one line.
    #[error("At least one line is required")]
    EmptyLines,

    /// Margin is negative or not a number after normalization.
    #[error("Invalid margin: {0}")]
    InvalidMargin(String),

    /// Sale type is not one of the enumerated values.
    #[error("Invalid sale type: {0}")]
    InvalidType(String),

    /// Cancelling a sale requires a reason.
    #[error("A cancellation reason is required")]
    MotiveRequired,

    // ========== Not Found Errors ==========
    /// Purchase not found.
    #[error("Purchase not found: {0}")]
    PurchaseNotFound(Uuid),

    /// Sale not found.
    #[error("Sale not found: {0}")]
    SaleNotFound(Uuid),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(Uuid),

    /// Presentation not found.
    #[error("Presentation not found: {0}")]
    PresentationNotFound(Uuid),

    /// Client not found.
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    // ========== Conflict Errors ==========
    /// Purchase number already registered.
    #[error("Purchase number {0} already exists")]
    DuplicatePurchaseNumber(i64),

    /// The purchase or sale is already void.
    #[error("Record {0} is already void")]
    AlreadyVoid(Uuid),

    /// Sale status does not allow the requested transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidState {
        /// Current status.
        from: SaleStatus,
        /// Requested status.
        to: SaleStatus,
    },

    // ========== Business Rule Errors ==========
    /// Presentation does not exist or belongs to another product.
    #[error("Presentation {presentation_id} is not valid for product {product_id}")]
    InvalidPresentation {
        /// Presentation ID.
        presentation_id: Uuid,
        /// Product ID.
        product_id: Uuid,
    },

    /// Not enough stock to cover the requested base units.
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product ID.
        product_id: Uuid,
        /// Base units requested.
        requested: i64,
        /// Base units on hand.
        available: i64,
    },

    /// Supplier does not exist or is inactive.
    #[error("Supplier {0} does not exist or is inactive")]
    InvalidSupplier(String),

    /// Client is inactive.
    #[error("Client {0} is inactive")]
    ClientInactive(String),

    /// Product is inactive.
    #[error("Product {0} is inactive")]
    ProductInactive(Uuid),

    /// Product carries a negative margin.
    #[error("Product {0} has a negative margin")]
    NegativeMargin(Uuid),

    /// A cost or sale price would become negative.
    #[error("Price for product {product_id} cannot be negative: {price}")]
    NegativePrice {
        /// Product ID.
        product_id: Uuid,
        /// Offending price.
        price: Decimal,
    },

    /// Purchase is older than the void window.
    #[error("Purchase is {age_days} days old; only purchases up to {max_days} days old can be voided")]
    TooOld {
        /// Purchase age in days.
        age_days: i64,
        /// Void window in days.
        max_days: i64,
    },

    /// Stock contributed by a purchase has already left the shelf.
    #[error("Stock from this purchase was already consumed for product {product_id}: required {required}, available {available}")]
    StockAlreadyConsumed {
        /// Product ID.
        product_id: Uuid,
        /// Base units the purchase contributed.
        required: i64,
        /// Base units on hand.
        available: i64,
    },

    // ========== Internal Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// Returns the error family.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::InvalidField { .. }
            | Self::EmptyLines
            | Self::InvalidMargin(_)
            | Self::InvalidType(_)
            | Self::MotiveRequired => ErrorKind::Validation,

            Self::PurchaseNotFound(_)
            | Self::SaleNotFound(_)
            | Self::ProductNotFound(_)
            | Self::PresentationNotFound(_)
            | Self::ClientNotFound(_) => ErrorKind::NotFound,

            Self::DuplicatePurchaseNumber(_) | Self::AlreadyVoid(_) | Self::InvalidState { .. } => {
                ErrorKind::Conflict
            }

            Self::InvalidPresentation { .. }
            | Self::InsufficientStock { .. }
            | Self::InvalidSupplier(_)
            | Self::ClientInactive(_)
            | Self::ProductInactive(_)
            | Self::NegativeMargin(_)
            | Self::NegativePrice { .. }
            | Self::TooOld { .. }
            | Self::StockAlreadyConsumed { .. } => ErrorKind::BusinessRule,

            Self::Database(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::EmptyLines => "EMPTY_LINES",
            Self::InvalidMargin(_) => "INVALID_MARGIN",
            Self::InvalidType(_) => "INVALID_TYPE",
            Self::MotiveRequired => "MOTIVE_REQUIRED",
            Self::PurchaseNotFound(_) => "PURCHASE_NOT_FOUND",
            Self::SaleNotFound(_) => "SALE_NOT_FOUND",
            Self::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
            Self::PresentationNotFound(_) => "PRESENTATION_NOT_FOUND",
            Self::ClientNotFound(_) => "CLIENT_NOT_FOUND",
            Self::DuplicatePurchaseNumber(_) => "DUPLICATE_PURCHASE_NUMBER",
            Self::AlreadyVoid(_) => "ALREADY_VOID",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::InvalidPresentation { .. } => "INVALID_PRESENTATION",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::InvalidSupplier(_) => "INVALID_SUPPLIER",
            Self::ClientInactive(_) => "CLIENT_INACTIVE",
            Self::ProductInactive(_) => "PRODUCT_INACTIVE",
            Self::NegativeMargin(_) => "NEGATIVE_MARGIN",
            Self::NegativePrice { .. } => "NEGATIVE_PRICE",
            Self::TooOld { .. } => "TOO_OLD",
            Self::StockAlreadyConsumed { .. } => "STOCK_ALREADY_CONSUMED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::BusinessRule => 422,
            ErrorKind::Internal => 500,
        }
    }

    /// `InvalidField` for an amount that does not fit the decimal range.
    #[must_use]
    pub fn out_of_range(field: &'static str) -> Self {
        Self::InvalidField {
            field,
            reason: "amount out of range".to_string(),
        }
    }
}

impl From<InventoryError> for AppError {
    fn from(err: InventoryError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::BusinessRule => Self::BusinessRule(message),
            ErrorKind::Internal => match err {
                InventoryError::Database(detail) => Self::Database(detail),
                _ => Self::Internal(message),
            },
        }
    }
}
