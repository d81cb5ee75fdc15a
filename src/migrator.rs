use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_quotations_table::Migration),
            Box::new(m20250301_000002_create_invoices_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_quotations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_quotations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Quotations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Quotations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Quotations::UniqueQuotationId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Quotations::ClientName).string().not_null())
                        .col(ColumnDef::new(Quotations::Email).string().not_null())
                        .col(ColumnDef::new(Quotations::Phone).string().not_null())
                        .col(
                            ColumnDef::new(Quotations::QuotationDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Quotations::Items).json().not_null())
                        .col(
                            ColumnDef::new(Quotations::TotalAmount)
                                .decimal_len(14, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Quotations::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(Quotations::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Quotations::UpdatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            // Useful indexes
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotations_status")
                        .table(Quotations::Table)
                        .col(Quotations::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_quotations_created_at")
                        .table(Quotations::Table)
                        .col(Quotations::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Quotations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Quotations {
        Table,
        Id,
        UniqueQuotationId,
        ClientName,
        Email,
        Phone,
        QuotationDate,
        Items,
        TotalAmount,
        Status,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_invoices_table {

    use sea_orm_migration::prelude::*;

    use super::m20250301_000001_create_quotations_table::Quotations;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_invoices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Invoices::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Invoices::InvoiceNumber)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Invoices::InvoiceDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::QuotationId).uuid().not_null())
                        .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Invoices::UpdatedAt).timestamp().not_null())
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_invoices_quotation_id")
                                .from(Invoices::Table, Invoices::QuotationId)
                                .to(Quotations::Table, Quotations::Id)
                                .on_delete(ForeignKeyAction::Restrict),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_quotation_id")
                        .table(Invoices::Table)
                        .col(Invoices::QuotationId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        InvoiceDate,
        QuotationId,
        CreatedAt,
        UpdatedAt,
    }
}
