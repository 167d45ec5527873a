use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::handlers::{auth, bookings, catalog, wizard};
use crate::middleware::auth::auth_middleware;
use crate::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn create_router(state: AppState) -> Router {
    // Public auth routes
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    // Signed-in user routes
    let account_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/bookings", get(bookings::my_bookings))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Public catalog routes
    let catalog_routes = Router::new()
        .route("/cities", get(catalog::list_cities))
        .route("/genres", get(catalog::list_genres))
        .route("/dates", get(catalog::list_dates))
        .route("/movies", get(catalog::list_movies))
        .route("/movies/{id}", get(catalog::get_movie))
        .route("/movies/{id}/showtimes", get(catalog::movie_showtimes))
        .route("/theaters", get(catalog::list_theaters));

    // Booking wizard; identity is only read on payment
    let wizard_routes = Router::new()
        .route("/", post(wizard::open))
        .route("/{id}", get(wizard::show).delete(wizard::close))
        .route("/{id}/date", post(wizard::select_date))
        .route("/{id}/showtime", post(wizard::select_showtime))
        .route("/{id}/seats/confirm", post(wizard::confirm_seats))
        .route("/{id}/seats/{code}", post(wizard::toggle_seat))
        .route("/{id}/payment", post(wizard::submit_payment))
        .route("/{id}/back", post(wizard::back))
        .route("/{id}/ticket", get(wizard::ticket));

    // Combine all routes
    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_routes)
        .nest("/api", account_routes.merge(catalog_routes))
        .nest("/api/wizard", wizard_routes)
        .with_state(state)
}
