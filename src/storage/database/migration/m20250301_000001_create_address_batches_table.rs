use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AddressBatches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AddressBatches::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AddressBatches::Kind).string().not_null())
                    .col(ColumnDef::new(AddressBatches::Status).string().not_null())
                    .col(
                        ColumnDef::new(AddressBatches::RequestPayload)
                            .json_binary()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_address_batches_kind_created_at")
                    .table(AddressBatches::Table)
                    .col(AddressBatches::Kind)
                    .col(AddressBatches::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_address_batches_status")
                    .table(AddressBatches::Table)
                    .col(AddressBatches::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AddressBatches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AddressBatches {
    Table,
    Id,
    Kind,
    Status,
    RequestPayload,
    CreatedAt,
}
