use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{self, TheaterShowtimes, ALL_GENRES, CITIES, DEFAULT_CITY, GENRES};
use crate::entities::{movie, theater};
use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MovieFilter {
    pub city: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CityFilter {
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateFilter {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<&'static str>,
    pub default_city: &'static str,
}

pub async fn list_cities() -> Json<CitiesResponse> {
    Json(CitiesResponse {
        cities: CITIES.to_vec(),
        default_city: DEFAULT_CITY,
    })
}

pub async fn list_genres() -> Json<Vec<&'static str>> {
    Json(GENRES.to_vec())
}

/// The bookable days, starting today
pub async fn list_dates() -> Json<Vec<NaiveDate>> {
    Json(catalog::upcoming_dates(Utc::now().date_naive()))
}

/// Active movies, optionally narrowed to a city and a genre
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filter): Query<MovieFilter>,
) -> AppResult<Json<Vec<movie::Model>>> {
    let backend = state.backend.as_ref();
    let movies = match filter.city.as_deref() {
        Some(city) => catalog::movies_in_city(backend, city).await?,
        None => backend.active_movies().await?,
    };

    let genre = filter.genre.as_deref().unwrap_or(ALL_GENRES);
    Ok(Json(catalog::filter_by_genre(movies, genre)))
}

pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<movie::Model>> {
    state
        .backend
        .find_movie(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))
}

/// Theaters playing a movie with their showtimes, optionally for one day
pub async fn movie_showtimes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(filter): Query<DateFilter>,
) -> AppResult<Json<Vec<TheaterShowtimes>>> {
    let backend = state.backend.as_ref();
    if backend.find_movie(id).await?.is_none() {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    Ok(Json(catalog::theater_listing(backend, id, filter.date).await?))
}

pub async fn list_theaters(
    State(state): State<AppState>,
    Query(filter): Query<CityFilter>,
) -> AppResult<Json<Vec<theater::Model>>> {
    Ok(Json(state.backend.theaters(filter.city.as_deref()).await?))
}
