//! `SeaORM` Entity for productos table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "productos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub categoria_id: Option<Uuid>,
    pub nombre: String,
    pub stock: i64,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub preciocompra: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub precioventa: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 4)))")]
    pub margenganancia: Decimal,
    pub estado: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categorias::Entity",
        from = "Column::CategoriaId",
        to = "super::categorias::Column::Id"
    )]
    Categorias,
    #[sea_orm(has_many = "super::presentaciones::Entity")]
    Presentaciones,
}

impl Related<super::categorias::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categorias.def()
    }
}

impl Related<super::presentaciones::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Presentaciones.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
