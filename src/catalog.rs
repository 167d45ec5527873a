//! Catalog lookups and the filters behind the listing page.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::entities::{movie, showtime, theater};
use crate::error::AppResult;

/// Genre value that disables genre filtering.
pub const ALL_GENRES: &str = "All";

pub const GENRES: [&str; 6] = [ALL_GENRES, "Action", "Adventure", "Drama", "Sci-Fi", "Crime"];

pub const CITIES: [&str; 10] = [
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Hyderabad",
    "Chennai",
    "Kolkata",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
];

pub const DEFAULT_CITY: &str = "Mumbai";

/// Length of the date strip, today included.
pub const BOOKING_WINDOW_DAYS: i64 = 7;

pub fn filter_by_genre(movies: Vec<movie::Model>, genre: &str) -> Vec<movie::Model> {
    if genre == ALL_GENRES {
        return movies;
    }
    movies.into_iter().filter(|m| m.has_genre(genre)).collect()
}

pub fn showtimes_on(showtimes: Vec<showtime::Model>, date: NaiveDate) -> Vec<showtime::Model> {
    showtimes.into_iter().filter(|s| s.show_date == date).collect()
}

pub fn upcoming_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..BOOKING_WINDOW_DAYS).map(|i| today + Duration::days(i)).collect()
}

/// Active movies with at least one showtime at a theater in `city`.
pub async fn movies_in_city(backend: &dyn BookingBackend, city: &str) -> AppResult<Vec<movie::Model>> {
    let theater_ids: Vec<Uuid> = backend
        .theaters(Some(city))
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    if theater_ids.is_empty() {
        return Ok(Vec::new());
    }

    let movie_ids: BTreeSet<Uuid> = backend
        .showtimes_for_theaters(&theater_ids)
        .await?
        .into_iter()
        .map(|s| s.movie_id)
        .collect();
    if movie_ids.is_empty() {
        return Ok(Vec::new());
    }

    let movie_ids: Vec<Uuid> = movie_ids.into_iter().collect();
    backend.movies_by_ids(&movie_ids).await
}

#[derive(Debug, Clone, Serialize)]
pub struct DatedShowtimes {
    pub date: NaiveDate,
    pub showtimes: Vec<showtime::Model>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TheaterShowtimes {
    pub theater: theater::Model,
    pub dates: Vec<DatedShowtimes>,
}

/// Theaters that have showtimes, in the given theater order, each with its
/// showtimes bucketed by day and sorted by time.
pub fn group_by_theater(theaters: &[theater::Model], showtimes: Vec<showtime::Model>) -> Vec<TheaterShowtimes> {
    let mut by_theater: BTreeMap<Uuid, BTreeMap<NaiveDate, Vec<showtime::Model>>> = BTreeMap::new();
    for showtime in showtimes {
        by_theater
            .entry(showtime.theater_id)
            .or_default()
            .entry(showtime.show_date)
            .or_default()
            .push(showtime);
    }

    theaters
        .iter()
        .filter_map(|theater| {
            let days = by_theater.remove(&theater.id)?;
            let dates = days
                .into_iter()
                .map(|(date, mut showtimes)| {
                    showtimes.sort_by_key(|s| s.show_time);
                    DatedShowtimes { date, showtimes }
                })
                .collect();
            Some(TheaterShowtimes {
                theater: theater.clone(),
                dates,
            })
        })
        .collect()
}

/// Where a movie is playing, optionally narrowed to one day.
pub async fn theater_listing(
    backend: &dyn BookingBackend,
    movie_id: Uuid,
    date: Option<NaiveDate>,
) -> AppResult<Vec<TheaterShowtimes>> {
    let theaters = backend.theaters(None).await?;
    let mut showtimes = backend.showtimes_for_movie(movie_id).await?;
    if let Some(date) = date {
        showtimes = showtimes_on(showtimes, date);
    }

    Ok(group_by_theater(&theaters, showtimes))
}
