//! Initial database migration.
//!
//! Creates the catalog tables (categories, products, presentations, suppliers,
//! clients) and the purchase and sale tables with their lines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: CATALOG
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Categorias::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Categorias::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Categorias::Nombre).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Categorias::Estado)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Productos::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Productos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Productos::CategoriaId).uuid().null())
                    .col(ColumnDef::new(Productos::Nombre).string_len(150).not_null())
                    .col(
                        ColumnDef::new(Productos::Stock)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Productos::Stock).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Productos::Preciocompra)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Productos::Preciocompra).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Productos::Precioventa)
                            .decimal_len(16, 2)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Productos::Precioventa).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Productos::Margenganancia)
                            .decimal_len(16, 4)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Productos::Margenganancia).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Productos::Estado)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_productos_categoria")
                            .from(Productos::Table, Productos::CategoriaId)
                            .to(Categorias::Table, Categorias::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Presentaciones::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Presentaciones::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Presentaciones::ProductoId).uuid().not_null())
                    .col(ColumnDef::new(Presentaciones::Nombre).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Presentaciones::FactorConversion)
                            .integer()
                            .not_null()
                            .check(Expr::col(Presentaciones::FactorConversion).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Presentaciones::EsPredeterminada)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Presentaciones::CodigoBarras).string_len(64).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_presentaciones_producto")
                            .from(Presentaciones::Table, Presentaciones::ProductoId)
                            .to(Productos::Table, Productos::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_presentaciones_producto")
                    .table(Presentaciones::Table)
                    .col(Presentaciones::ProductoId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Proveedores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Proveedores::Nit)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Proveedores::Nombre).string_len(150).not_null())
                    .col(ColumnDef::new(Proveedores::Email).string_len(150).null())
                    .col(
                        ColumnDef::new(Proveedores::Estado)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Clientes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Clientes::Documento)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Clientes::Nombre).string_len(150).not_null())
                    .col(ColumnDef::new(Clientes::Email).string_len(150).null())
                    .col(
                        ColumnDef::new(Clientes::Estado)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: PURCHASES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Compras::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Compras::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Compras::Nrodecompra)
                            .big_integer()
                            .not_null()
                            .unique_key()
                            .check(Expr::col(Compras::Nrodecompra).gt(0)),
                    )
                    .col(ColumnDef::new(Compras::Fechadecompra).date().not_null())
                    .col(
                        ColumnDef::new(Compras::Fechaderegistro)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Compras::Estado)
                            .small_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(Compras::Total).decimal_len(16, 2).not_null())
                    .col(ColumnDef::new(Compras::Nitproveedor).string_len(20).not_null())
                    .col(ColumnDef::new(Compras::MotivoAnulacion).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_compras_proveedor")
                            .from(Compras::Table, Compras::Nitproveedor)
                            .to(Proveedores::Table, Proveedores::Nit),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DetalleCompras::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DetalleCompras::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DetalleCompras::CompraId).uuid().not_null())
                    .col(ColumnDef::new(DetalleCompras::ProductoId).uuid().not_null())
                    .col(ColumnDef::new(DetalleCompras::PresentacionId).uuid().not_null())
                    .col(ColumnDef::new(DetalleCompras::Posicion).integer().not_null())
                    .col(
                        ColumnDef::new(DetalleCompras::Cantidad)
                            .integer()
                            .not_null()
                            .check(Expr::col(DetalleCompras::Cantidad).gt(0)),
                    )
                    .col(
                        ColumnDef::new(DetalleCompras::FactorConversion)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleCompras::Preciodecompra)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleCompras::Subtotal)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleCompras::PreciocompraAnterior)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleCompras::PrecioventaAnterior)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_compras_compra")
                            .from(DetalleCompras::Table, DetalleCompras::CompraId)
                            .to(Compras::Table, Compras::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_compras_producto")
                            .from(DetalleCompras::Table, DetalleCompras::ProductoId)
                            .to(Productos::Table, Productos::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_compras_presentacion")
                            .from(DetalleCompras::Table, DetalleCompras::PresentacionId)
                            .to(Presentaciones::Table, Presentaciones::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_detalle_compras_compra")
                    .table(DetalleCompras::Table)
                    .col(DetalleCompras::CompraId)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: SALES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Ventas::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Ventas::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Ventas::Documentocliente).string_len(20).not_null())
                    .col(
                        ColumnDef::new(Ventas::Fechaventa)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Ventas::Total).decimal_len(16, 2).not_null())
                    .col(ColumnDef::new(Ventas::Estado).string_len(20).not_null())
                    .col(ColumnDef::new(Ventas::Tipo).string_len(20).not_null())
                    .col(ColumnDef::new(Ventas::MotivoAnulacion).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ventas_cliente")
                            .from(Ventas::Table, Ventas::Documentocliente)
                            .to(Clientes::Table, Clientes::Documento),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(DetalleVentas::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DetalleVentas::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DetalleVentas::VentaId).uuid().not_null())
                    .col(ColumnDef::new(DetalleVentas::ProductoId).uuid().not_null())
                    .col(ColumnDef::new(DetalleVentas::PresentacionId).uuid().not_null())
                    .col(ColumnDef::new(DetalleVentas::Posicion).integer().not_null())
                    .col(
                        ColumnDef::new(DetalleVentas::Cantidad)
                            .integer()
                            .not_null()
                            .check(Expr::col(DetalleVentas::Cantidad).gt(0)),
                    )
                    .col(
                        ColumnDef::new(DetalleVentas::FactorConversion)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleVentas::Precioventa)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DetalleVentas::Subtotal)
                            .decimal_len(16, 2)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_ventas_venta")
                            .from(DetalleVentas::Table, DetalleVentas::VentaId)
                            .to(Ventas::Table, Ventas::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_ventas_producto")
                            .from(DetalleVentas::Table, DetalleVentas::ProductoId)
                            .to(Productos::Table, Productos::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_detalle_ventas_presentacion")
                            .from(DetalleVentas::Table, DetalleVentas::PresentacionId)
                            .to(Presentaciones::Table, Presentaciones::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_detalle_ventas_venta")
                    .table(DetalleVentas::Table)
                    .col(DetalleVentas::VentaId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DetalleVentas::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Ventas::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DetalleCompras::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Compras::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Clientes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Proveedores::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Presentaciones::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Productos::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categorias::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Categorias {
    Table,
    Id,
    Nombre,
    Estado,
}

#[derive(DeriveIden)]
enum Productos {
    Table,
    Id,
    CategoriaId,
    Nombre,
    Stock,
    Preciocompra,
    Precioventa,
    Margenganancia,
    Estado,
}

#[derive(DeriveIden)]
enum Presentaciones {
    Table,
    Id,
    ProductoId,
    Nombre,
    FactorConversion,
    EsPredeterminada,
    CodigoBarras,
}

#[derive(DeriveIden)]
enum Proveedores {
    Table,
    Nit,
    Nombre,
    Email,
    Estado,
}

#[derive(DeriveIden)]
enum Clientes {
    Table,
    Documento,
    Nombre,
    Email,
    Estado,
}

#[derive(DeriveIden)]
enum Compras {
    Table,
    Id,
    Nrodecompra,
    Fechadecompra,
    Fechaderegistro,
    Estado,
    Total,
    Nitproveedor,
    MotivoAnulacion,
}

#[derive(DeriveIden)]
enum DetalleCompras {
    Table,
    Id,
    CompraId,
    ProductoId,
    PresentacionId,
    Posicion,
    Cantidad,
    FactorConversion,
    Preciodecompra,
    Subtotal,
    PreciocompraAnterior,
    PrecioventaAnterior,
}

#[derive(DeriveIden)]
enum Ventas {
    Table,
    Id,
    Documentocliente,
    Fechaventa,
    Total,
    Estado,
    Tipo,
    MotivoAnulacion,
}

#[derive(DeriveIden)]
enum DetalleVentas {
    Table,
    Id,
    VentaId,
    ProductoId,
    PresentacionId,
    Posicion,
    Cantidad,
    FactorConversion,
    Precioventa,
    Subtotal,
}
