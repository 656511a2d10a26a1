//! `SeaORM` Entity for detalle_compras table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "detalle_compras")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub compra_id: Uuid,
    pub producto_id: Uuid,
    pub presentacion_id: Uuid,
    pub posicion: i32,
    pub cantidad: i32,
    pub factor_conversion: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub preciodecompra: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub subtotal: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub preciocompra_anterior: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub precioventa_anterior: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::compras::Entity",
        from = "Column::CompraId",
        to = "super::compras::Column::Id"
    )]
    Compras,
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

impl Related<super::compras::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Compras.def()
    }
}

impl Related<super::productos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Productos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
