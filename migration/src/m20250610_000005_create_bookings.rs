use sea_orm_migration::{prelude::*, schema::*};

use super::m20250610_000001_create_movies::Movie;
use super::m20250610_000002_create_theaters::Theater;
use super::m20250610_000003_create_showtimes::Showtime;
use super::m20250610_000004_create_users::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::UserId).not_null())
                    .col(uuid(Booking::MovieId).not_null())
                    .col(uuid(Booking::TheaterId).not_null())
                    .col(uuid(Booking::ShowtimeId).not_null())
                    .col(
                        ColumnDef::new(Booking::SelectedSeats)
                            .array(ColumnType::Text)
                            .not_null(),
                    )
                    .col(decimal_len(Booking::TotalAmount, 10, 2).not_null())
                    .col(string_len(Booking::PaymentMethod, 50).not_null())
                    .col(
                        string_len(Booking::PaymentStatus, 20)
                            .not_null()
                            .default("pending"),
                    )
                    // Client-generated; a collision is possible in principle.
                    .col(string_len(Booking::BookingReference, 40).not_null())
                    .col(
                        timestamp_with_time_zone(Booking::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Booking::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_user")
                            .from(Booking::Table, Booking::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_movie")
                            .from(Booking::Table, Booking::MovieId)
                            .to(Movie::Table, Movie::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_theater")
                            .from(Booking::Table, Booking::TheaterId)
                            .to(Theater::Table, Theater::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_showtime")
                            .from(Booking::Table, Booking::ShowtimeId)
                            .to(Showtime::Table, Showtime::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_booking_user")
                    .table(Booking::Table)
                    .col(Booking::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Booking {
    Table,
    Id,
    UserId,
    MovieId,
    TheaterId,
    ShowtimeId,
    SelectedSeats,
    TotalAmount,
    PaymentMethod,
    PaymentStatus,
    BookingReference,
    CreatedAt,
    UpdatedAt,
}
