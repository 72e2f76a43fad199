use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AddressBatchItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AddressBatchItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::BatchId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::Original)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::Result)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::Messages)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AddressBatchItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_address_batch_items_batch_id")
                            .from(AddressBatchItems::Table, AddressBatchItems::BatchId)
                            .to(AddressBatches::Table, AddressBatches::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_address_batch_items_batch_id")
                    .table(AddressBatchItems::Table)
                    .col(AddressBatchItems::BatchId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_address_batch_items_batch_id_position")
                    .table(AddressBatchItems::Table)
                    .col(AddressBatchItems::BatchId)
                    .col(AddressBatchItems::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AddressBatchItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AddressBatchItems {
    Table,
    Id,
    BatchId,
    Position,
    Status,
    Original,
    Result,
    Messages,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AddressBatches {
    Table,
    Id,
}
