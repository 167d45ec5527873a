//! The managed backend the storefront delegates persistence and identity to.
//!
//! Everything the catalog, the booking wizard and the auth handlers read or
//! write goes through [`BookingBackend`], so the wizard can be driven against
//! an in-memory implementation as easily as against Postgres.

pub mod postgres;

use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::entities::{booking, movie, showtime, theater, user};
use crate::error::AppResult;

pub use postgres::PgBackend;

/// A booking row as written on payment success.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub theater_id: Uuid,
    pub showtime_id: Uuid,
    pub selected_seats: Vec<String>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub booking_reference: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
}

#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Active movies, newest first.
    async fn active_movies(&self) -> AppResult<Vec<movie::Model>>;

    /// Active movies among `ids`, newest first.
    async fn movies_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<movie::Model>>;

    async fn find_movie(&self, id: Uuid) -> AppResult<Option<movie::Model>>;

    /// All theaters, or only those in `city`, ordered by name.
    async fn theaters(&self, city: Option<&str>) -> AppResult<Vec<theater::Model>>;

    async fn find_theater(&self, id: Uuid) -> AppResult<Option<theater::Model>>;

    /// Showtimes of a movie ordered by date, then time.
    async fn showtimes_for_movie(&self, movie_id: Uuid) -> AppResult<Vec<showtime::Model>>;

    async fn showtimes_for_theaters(&self, theater_ids: &[Uuid]) -> AppResult<Vec<showtime::Model>>;

    async fn find_showtime(&self, id: Uuid) -> AppResult<Option<showtime::Model>>;

    async fn insert_booking(&self, booking: NewBooking) -> AppResult<booking::Model>;

    /// Overwrites the available seat count. Not conditional on the previous value.
    async fn update_available_seats(&self, showtime_id: Uuid, available: i32) -> AppResult<()>;

    /// Bookings of a user, newest first.
    async fn bookings_for_user(&self, user_id: Uuid) -> AppResult<Vec<booking::Model>>;

    async fn find_user(&self, id: Uuid) -> AppResult<Option<user::Model>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>>;

    async fn insert_user(&self, user: NewUser) -> AppResult<user::Model>;
}
