use std::collections::HashMap;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{movie, theater};
use crate::error::AppResult;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BookingHistoryEntry {
    pub id: Uuid,
    pub booking_reference: String,
    pub movie_title: Option<String>,
    pub theater_name: Option<String>,
    pub show_date: Option<NaiveDate>,
    pub show_time: Option<NaiveTime>,
    pub unit_price: Option<Decimal>,
    pub selected_seats: Vec<String>,
    pub total_amount: Decimal,
    pub payment_method: String,
    pub payment_status: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Bookings of the signed-in user, newest first
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingHistoryEntry>>> {
    let backend = state.backend.as_ref();
    let bookings = backend.bookings_for_user(claims.sub).await?;

    let mut movies: HashMap<Uuid, Option<movie::Model>> = HashMap::new();
    let mut theaters: HashMap<Uuid, Option<theater::Model>> = HashMap::new();

    let mut entries = Vec::with_capacity(bookings.len());
    for b in bookings {
        if !movies.contains_key(&b.movie_id) {
            movies.insert(b.movie_id, backend.find_movie(b.movie_id).await?);
        }
        if !theaters.contains_key(&b.theater_id) {
            theaters.insert(b.theater_id, backend.find_theater(b.theater_id).await?);
        }
        let showtime = backend.find_showtime(b.showtime_id).await?;

        let movie = movies.get(&b.movie_id).and_then(Option::as_ref);
        let theater = theaters.get(&b.theater_id).and_then(Option::as_ref);

        entries.push(BookingHistoryEntry {
            id: b.id,
            booking_reference: b.booking_reference,
            movie_title: movie.map(|m| m.title.clone()),
            theater_name: theater.map(|t| t.name.clone()),
            show_date: showtime.as_ref().map(|s| s.show_date),
            show_time: showtime.as_ref().map(|s| s.show_time),
            unit_price: showtime.as_ref().map(|s| s.price),
            selected_seats: b.selected_seats,
            total_amount: b.total_amount,
            payment_method: b.payment_method,
            payment_status: b.payment_status,
            created_at: b.created_at,
        });
    }

    Ok(Json(entries))
}
