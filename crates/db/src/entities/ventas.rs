//! `SeaORM` Entity for ventas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{SaleStatus, SaleType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ventas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub documentocliente: String,
    pub fechaventa: DateTimeWithTimeZone,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub total: Decimal,
    pub estado: SaleStatus,
    pub tipo: SaleType,
    pub motivo_anulacion: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clientes::Entity",
        from = "Column::Documentocliente",
        to = "super::clientes::Column::Documento"
    )]
    Clientes,
    #[sea_orm(has_many = "super::detalle_ventas::Entity")]
    DetalleVentas,
}

impl Related<super::clientes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clientes.def()
    }
}

impl Related<super::detalle_ventas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DetalleVentas.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
