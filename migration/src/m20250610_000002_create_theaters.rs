use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Theater::Table)
                    .if_not_exists()
                    .col(uuid(Theater::Id).primary_key())
                    .col(string_len(Theater::Name, 255).not_null())
                    .col(string_len(Theater::Address, 512).not_null())
                    .col(string_len(Theater::City, 100).not_null())
                    .col(string_len_null(Theater::Phone, 50))
                    .col(
                        timestamp_with_time_zone(Theater::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_theater_city")
                    .table(Theater::Table)
                    .col(Theater::City)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Theater::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Theater {
    Table,
    Id,
    Name,
    Address,
    City,
    Phone,
    CreatedAt,
}
