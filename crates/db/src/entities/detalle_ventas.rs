//! `SeaORM` Entity for detalle_ventas table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "detalle_ventas")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub venta_id: Uuid,
    pub producto_id: Uuid,
    pub presentacion_id: Uuid,
    pub posicion: i32,
    pub cantidad: i32,
    pub factor_conversion: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub precioventa: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub subtotal: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ventas::Entity",
        from = "Column::VentaId",
        to = "super::ventas::Column::Id"
    )]
    Ventas,
    #[sea_orm(
        belongs_to = "super::productos::Entity",
        from = "Column::ProductoId",
        to = "super::productos::Column::Id"
    )]
    Productos,
    #[sea_orm(
        belongs_to = "super::presentaciones::Entity",
        from = "Column::PresentacionId",
        to = "super::presentaciones::Column::Id"
    )]
    Presentaciones,
}

impl Related<super::ventas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ventas.def()
    }
}

impl Related<super::productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
