//! `SeaORM` Entity for compras table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PurchaseStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "compras")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub nrodecompra: i64,
    pub fechadecompra: Date,
    pub fechaderegistro: DateTimeWithTimeZone,
    pub estado: PurchaseStatus,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total: Decimal,
    pub nitproveedor: String,
    pub motivo_anulacion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::proveedores::Entity",
        from = "Column::Nitproveedor",
        to = "super::proveedores::Column::Nit"
    )]
    Proveedores,
    #[sea_orm(has_many = "super::detalle_compras::Entity")]
    DetalleCompras,
}

impl Related<super::proveedores::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Proveedores.def()
    }
}

impl Related<super::detalle_compras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DetalleCompras.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
