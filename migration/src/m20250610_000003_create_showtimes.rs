use sea_orm_migration::{prelude::*, schema::*};

use super::m20250610_000001_create_movies::Movie;
use super::m20250610_000002_create_theaters::Theater;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Showtime::Table)
                    .if_not_exists()
                    .col(uuid(Showtime::Id).primary_key())
                    .col(uuid(Showtime::MovieId).not_null())
                    .col(uuid(Showtime::TheaterId).not_null())
                    .col(date(Showtime::ShowDate).not_null())
                    .col(time(Showtime::ShowTime).not_null())
                    .col(decimal_len(Showtime::Price, 10, 2).not_null())
                    .col(integer(Showtime::AvailableSeats).not_null().default(120))
                    .col(integer(Showtime::TotalSeats).not_null().default(120))
                    .col(
                        timestamp_with_time_zone(Showtime::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showtime_movie")
                            .from(Showtime::Table, Showtime::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_showtime_theater")
                            .from(Showtime::Table, Showtime::TheaterId)
                            .to(Theater::Table, Theater::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Showtime::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Showtime {
    Table,
    Id,
    MovieId,
    TheaterId,
    ShowDate,
    ShowTime,
    Price,
    AvailableSeats,
    TotalSeats,
    CreatedAt,
}
