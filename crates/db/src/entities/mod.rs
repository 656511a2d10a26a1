//! `SeaORM` entity definitions.

pub mod categorias;
pub mod clientes;
pub mod compras;
pub mod detalle_compras;
pub mod detalle_ventas;
pub mod presentaciones;
pub mod productos;
pub mod proveedores;
pub mod sea_orm_active_enums;
pub mod ventas;
