//! `SeaORM` active enums and their mapping to the engine enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tendero_core::{purchase, sale};

/// Purchase status column (1 = active, 0 = void).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i16", db_type = "SmallInteger")]
#[serde(rename_all = "UPPERCASE")]
pub enum PurchaseStatus {
    #[sea_orm(num_value = 1)]
    Active,
    #[sea_orm(num_value = 0)]
    Void,
}

/// Sale status column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "UPPERCASE")]
pub enum SaleStatus {
    #[sea_orm(string_value = "PENDIENTE")]
    Pendiente,
    #[sea_orm(string_value = "COMPLETADA")]
    Completada,
    #[sea_orm(string_value = "ANULADA")]
    Anulada,
}

/// Sale type column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleType {
    #[sea_orm(string_value = "VENTA_DIRECTA")]
    VentaDirecta,
    #[sea_orm(string_value = "PEDIDO_MOVIL")]
    PedidoMovil,
}

impl From<PurchaseStatus> for purchase::PurchaseStatus {
    fn from(value: PurchaseStatus) -> Self {
        match value {
            PurchaseStatus::Active => Self::Active,
            PurchaseStatus::Void => Self::Void,
        }
    }
}

impl From<purchase::PurchaseStatus> for PurchaseStatus {
    fn from(value: purchase::PurchaseStatus) -> Self {
        match value {
            purchase::PurchaseStatus::Active => Self::Active,
            purchase::PurchaseStatus::Void => Self::Void,
        }
    }
}

impl From<SaleStatus> for sale::SaleStatus {
    fn from(value: SaleStatus) -> Self {
        match value {
            SaleStatus::Pendiente => Self::Pendiente,
            SaleStatus::Completada => Self::Completada,
            SaleStatus::Anulada => Self::Anulada,
        }
    }
}

impl From<sale::SaleStatus> for SaleStatus {
    fn from(value: sale::SaleStatus) -> Self {
        match value {
            sale::SaleStatus::Pendiente => Self::Pendiente,
            sale::SaleStatus::Completada => Self::Completada,
            sale::SaleStatus::Anulada => Self::Anulada,
        }
    }
}

impl From<SaleType> for sale::SaleType {
    fn from(value: SaleType) -> Self {
        match value {
            SaleType::VentaDirecta => Self::VentaDirecta,
            SaleType::PedidoMovil => Self::PedidoMovil,
        }
    }
}

impl From<sale::SaleType> for SaleType {
    fn from(value: sale::SaleType) -> Self {
        match value {
            sale::SaleType::VentaDirecta => Self::VentaDirecta,
            sale::SaleType::PedidoMovil => Self::PedidoMovil,
        }
    }
}
