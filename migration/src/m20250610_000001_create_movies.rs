use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Movie::Table)
                    .if_not_exists()
                    .col(uuid(Movie::Id).primary_key())
                    .col(string_len(Movie::Title, 255).not_null())
                    .col(text_null(Movie::Description))
                    .col(string_len_null(Movie::PosterUrl, 512))
                    .col(double_null(Movie::Rating))
                    .col(integer_null(Movie::Duration))
                    .col(date_null(Movie::ReleaseDate))
                    .col(string_len_null(Movie::Language, 50))
                    .col(
                        ColumnDef::new(Movie::Genres)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'")),
                    )
                    .col(boolean(Movie::IsActive).not_null().default(true))
                    .col(
                        timestamp_with_time_zone(Movie::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Movie::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Movie {
    Table,
    Id,
    Title,
    Description,
    PosterUrl,
    Rating,
    Duration,
    ReleaseDate,
    Language,
    Genres,
    IsActive,
    CreatedAt,
}
