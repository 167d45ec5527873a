use async_trait::async_trait;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::{BookingBackend, NewBooking, NewUser};
use crate::entities::{booking, movie, showtime, theater, user};
use crate::error::{AppError, AppResult};

/// [`BookingBackend`] over a SeaORM Postgres connection.
#[derive(Clone)]
pub struct PgBackend {
    db: DatabaseConnection,
}

impl PgBackend {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Logs a backend failure before handing it to the caller.
fn logged(action: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| {
        tracing::error!(error = %e, "Error {}", action);
        AppError::Database(e)
    }
}

#[async_trait]
impl BookingBackend for PgBackend {
    async fn active_movies(&self) -> AppResult<Vec<movie::Model>> {
        movie::Entity::find()
            .filter(movie::Column::IsActive.eq(true))
            .order_by_desc(movie::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(logged("fetching movies"))
    }

    async fn movies_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<movie::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        movie::Entity::find()
            .filter(movie::Column::Id.is_in(ids.iter().copied()))
            .filter(movie::Column::IsActive.eq(true))
            .order_by_desc(movie::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(logged("fetching movies"))
    }

    async fn find_movie(&self, id: Uuid) -> AppResult<Option<movie::Model>> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(logged("fetching movie"))
    }

    async fn theaters(&self, city: Option<&str>) -> AppResult<Vec<theater::Model>> {
        let mut query = theater::Entity::find();
        if let Some(city) = city {
            query = query.filter(theater::Column::City.eq(city));
        }

        query
            .order_by_asc(theater::Column::Name)
            .all(&self.db)
            .await
            .map_err(logged("fetching theaters"))
    }

    async fn find_theater(&self, id: Uuid) -> AppResult<Option<theater::Model>> {
        theater::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(logged("fetching theater"))
    }

    async fn showtimes_for_movie(&self, movie_id: Uuid) -> AppResult<Vec<showtime::Model>> {
        showtime::Entity::find()
            .filter(showtime::Column::MovieId.eq(movie_id))
            .order_by_asc(showtime::Column::ShowDate)
            .order_by_asc(showtime::Column::ShowTime)
            .all(&self.db)
            .await
            .map_err(logged("fetching showtimes"))
    }

    async fn showtimes_for_theaters(&self, theater_ids: &[Uuid]) -> AppResult<Vec<showtime::Model>> {
        if theater_ids.is_empty() {
            return Ok(Vec::new());
        }

        showtime::Entity::find()
            .filter(showtime::Column::TheaterId.is_in(theater_ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(logged("fetching showtimes"))
    }

    async fn find_showtime(&self, id: Uuid) -> AppResult<Option<showtime::Model>> {
        showtime::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(logged("fetching showtime"))
    }

    async fn insert_booking(&self, new_booking: NewBooking) -> AppResult<booking::Model> {
        let active = booking::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new_booking.user_id),
            movie_id: Set(new_booking.movie_id),
            theater_id: Set(new_booking.theater_id),
            showtime_id: Set(new_booking.showtime_id),
            selected_seats: Set(new_booking.selected_seats),
            total_amount: Set(new_booking.total_amount),
            payment_method: Set(new_booking.payment_method),
            payment_status: Set(new_booking.payment_status),
            booking_reference: Set(new_booking.booking_reference),
            ..Default::default()
        };

        active.insert(&self.db).await.map_err(logged("creating booking"))
    }

    async fn update_available_seats(&self, showtime_id: Uuid, available: i32) -> AppResult<()> {
        let result = showtime::Entity::update_many()
            .col_expr(showtime::Column::AvailableSeats, Expr::value(available))
            .filter(showtime::Column::Id.eq(showtime_id))
            .exec(&self.db)
            .await
            .map_err(logged("updating available seats"))?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Showtime not found".to_string()));
        }

        Ok(())
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> AppResult<Vec<booking::Model>> {
        booking::Entity::find()
            .filter(booking::Column::UserId.eq(user_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(logged("fetching bookings"))
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(logged("fetching user"))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(logged("fetching user"))
    }

    async fn insert_user(&self, new_user: NewUser) -> AppResult<user::Model> {
        let active = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(new_user.email),
            password_hash: Set(new_user.password_hash),
            full_name: Set(new_user.full_name),
            ..Default::default()
        };

        active.insert(&self.db).await.map_err(logged("creating user"))
    }
}
