#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::DbErr;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use cinema_booking_backend::{
    backend::{BookingBackend, NewBooking, NewUser},
    booking::WizardSessions,
    config::Config,
    entities::{booking, movie, showtime, theater, user},
    routes::create_router,
    utils::jwt::create_token,
    AppError, AppResult, AppState,
};

pub const JWT_SECRET: &str = "test-secret";

/// Backend kept in plain vectors, with switches to make writes fail.
#[derive(Default)]
pub struct InMemoryBackend {
    pub movies: Mutex<Vec<movie::Model>>,
    pub theaters: Mutex<Vec<theater::Model>>,
    pub showtimes: Mutex<Vec<showtime::Model>>,
    pub bookings: Mutex<Vec<booking::Model>>,
    pub users: Mutex<Vec<user::Model>>,
    pub fail_booking_insert: AtomicBool,
    pub fail_seat_update: AtomicBool,
}

impl InMemoryBackend {
    pub fn bookings(&self) -> Vec<booking::Model> {
        self.bookings.lock().unwrap().clone()
    }

    pub fn showtime(&self, id: Uuid) -> showtime::Model {
        self.showtimes
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl BookingBackend for InMemoryBackend {
    async fn active_movies(&self) -> AppResult<Vec<movie::Model>> {
        Ok(self.movies.lock().unwrap().iter().filter(|m| m.is_active).cloned().collect())
    }

    async fn movies_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<movie::Model>> {
        Ok(self
            .movies
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_active && ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn find_movie(&self, id: Uuid) -> AppResult<Option<movie::Model>> {
        Ok(self.movies.lock().unwrap().iter().find(|m| m.id == id).cloned())
    }

    async fn theaters(&self, city: Option<&str>) -> AppResult<Vec<theater::Model>> {
        let mut theaters: Vec<theater::Model> = self
            .theaters
            .lock()
            .unwrap()
            .iter()
            .filter(|t| city.is_none_or(|c| t.city == c))
            .cloned()
            .collect();
        theaters.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(theaters)
    }

    async fn find_theater(&self, id: Uuid) -> AppResult<Option<theater::Model>> {
        Ok(self.theaters.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn showtimes_for_movie(&self, movie_id: Uuid) -> AppResult<Vec<showtime::Model>> {
        let mut showtimes: Vec<showtime::Model> = self
            .showtimes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.movie_id == movie_id)
            .cloned()
            .collect();
        showtimes.sort_by_key(|s| (s.show_date, s.show_time));
        Ok(showtimes)
    }

    async fn showtimes_for_theaters(&self, theater_ids: &[Uuid]) -> AppResult<Vec<showtime::Model>> {
        Ok(self
            .showtimes
            .lock()
            .unwrap()
            .iter()
            .filter(|s| theater_ids.contains(&s.theater_id))
            .cloned()
            .collect())
    }

    async fn find_showtime(&self, id: Uuid) -> AppResult<Option<showtime::Model>> {
        Ok(self.showtimes.lock().unwrap().iter().find(|s| s.id == id).cloned())
    }

    async fn insert_booking(&self, new_booking: NewBooking) -> AppResult<booking::Model> {
        if self.fail_booking_insert.load(Ordering::SeqCst) {
            return Err(AppError::Database(DbErr::Custom("insert refused".to_string())));
        }

        let now = Utc::now().fixed_offset();
        let model = booking::Model {
            id: Uuid::new_v4(),
            user_id: new_booking.user_id,
            movie_id: new_booking.movie_id,
            theater_id: new_booking.theater_id,
            showtime_id: new_booking.showtime_id,
            selected_seats: new_booking.selected_seats,
            total_amount: new_booking.total_amount,
            payment_method: new_booking.payment_method,
            payment_status: new_booking.payment_status,
            booking_reference: new_booking.booking_reference,
            created_at: now,
            updated_at: now,
        };
        self.bookings.lock().unwrap().push(model.clone());
        Ok(model)
    }

    async fn update_available_seats(&self, showtime_id: Uuid, available: i32) -> AppResult<()> {
        if self.fail_seat_update.load(Ordering::SeqCst) {
            return Err(AppError::Database(DbErr::Custom("update refused".to_string())));
        }

        let mut showtimes = self.showtimes.lock().unwrap();
        let showtime = showtimes
            .iter_mut()
            .find(|s| s.id == showtime_id)
            .ok_or_else(|| AppError::NotFound("Showtime not found".to_string()))?;
        showtime.available_seats = available;
        Ok(())
    }

    async fn bookings_for_user(&self, user_id: Uuid) -> AppResult<Vec<booking::Model>> {
        let mut bookings: Vec<booking::Model> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.reverse();
        Ok(bookings)
    }

    async fn find_user(&self, id: Uuid) -> AppResult<Option<user::Model>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> AppResult<user::Model> {
        let model = user::Model {
            id: Uuid::new_v4(),
            email: new_user.email,
            password_hash: new_user.password_hash,
            full_name: new_user.full_name,
            created_at: Utc::now().fixed_offset(),
        };
        self.users.lock().unwrap().push(model.clone());
        Ok(model)
    }
}

/// Ids of the catalog every test starts with.
///
/// Dune plays in Mumbai today and tomorrow at 250 with every seat free.
/// The Batman plays in Delhi only.
pub struct Fixture {
    pub dune: Uuid,
    pub batman: Uuid,
    pub retired: Uuid,
    pub mumbai_theater: Uuid,
    pub delhi_theater: Uuid,
    pub dune_today: Uuid,
    pub dune_tomorrow: Uuid,
    pub batman_today: Uuid,
}

fn movie(title: &str, genres: &[&str], is_active: bool) -> movie::Model {
    movie::Model {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        poster_url: None,
        rating: Some(8.0),
        duration: Some(150),
        release_date: None,
        language: Some("English".to_string()),
        genres: genres.iter().map(|g| g.to_string()).collect(),
        is_active,
        created_at: Utc::now().fixed_offset(),
    }
}

fn theater(name: &str, city: &str) -> theater::Model {
    theater::Model {
        id: Uuid::new_v4(),
        name: name.to_string(),
        address: format!("Main Road, {}", city),
        city: city.to_string(),
        phone: None,
        created_at: Utc::now().fixed_offset(),
    }
}

fn showtime(movie_id: Uuid, theater_id: Uuid, date: NaiveDate, hour: u32) -> showtime::Model {
    showtime::Model {
        id: Uuid::new_v4(),
        movie_id,
        theater_id,
        show_date: date,
        show_time: NaiveTime::from_hms_opt(hour, 30, 0).unwrap(),
        price: Decimal::from(250),
        available_seats: 120,
        total_seats: 120,
        created_at: Utc::now().fixed_offset(),
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl InMemoryBackend {
    pub fn with_fixture() -> (Self, Fixture) {
        let backend = Self::default();

        let dune = movie("Dune", &["Action", "Adventure", "Drama"], true);
        let batman = movie("The Batman", &["Action", "Crime", "Drama"], true);
        let retired = movie("Old Feature", &["Drama"], false);
        let mumbai = theater("PVR Phoenix", "Mumbai");
        let delhi = theater("INOX Nehru Place", "Delhi");

        let dune_today = showtime(dune.id, mumbai.id, today(), 18);
        let dune_tomorrow = showtime(dune.id, mumbai.id, today() + Duration::days(1), 21);
        let batman_today = showtime(batman.id, delhi.id, today(), 20);
        let retired_today = showtime(retired.id, mumbai.id, today(), 10);

        let fixture = Fixture {
            dune: dune.id,
            batman: batman.id,
            retired: retired.id,
            mumbai_theater: mumbai.id,
            delhi_theater: delhi.id,
            dune_today: dune_today.id,
            dune_tomorrow: dune_tomorrow.id,
            batman_today: batman_today.id,
        };

        *backend.movies.lock().unwrap() = vec![dune, batman, retired];
        *backend.theaters.lock().unwrap() = vec![mumbai, delhi];
        *backend.showtimes.lock().unwrap() = vec![dune_today, dune_tomorrow, batman_today, retired_today];

        (backend, fixture)
    }
}

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<InMemoryBackend>,
    pub sessions: WizardSessions,
    pub fixture: Fixture,
}

pub fn test_config(payment_delay_ms: u64) -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        payment_delay_ms,
        wizard_session_ttl_minutes: 30,
        seed_demo_data: false,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_payment_delay(0)
    }

    pub fn with_payment_delay(payment_delay_ms: u64) -> Self {
        let (backend, fixture) = InMemoryBackend::with_fixture();
        let backend = Arc::new(backend);
        let sessions = WizardSessions::new();

        let state = AppState {
            backend: backend.clone(),
            sessions: sessions.clone(),
            config: test_config(payment_delay_ms),
        };

        Self {
            router: create_router(state),
            backend,
            sessions,
            fixture,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Extractor rejections come back as plain text
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body), None).await
    }

    /// A stored user and a valid bearer token for it, without going through
    /// password hashing.
    pub fn sign_in(&self, email: &str) -> (Uuid, String) {
        let user = user::Model {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            full_name: "Test User".to_string(),
            created_at: Utc::now().fixed_offset(),
        };
        let id = user.id;
        self.backend.users.lock().unwrap().push(user);

        let token = create_token(id, email, JWT_SECRET, 1).unwrap();
        (id, token)
    }

    pub async fn open_wizard(&self, movie_id: Uuid, ticket_count: i64) -> String {
        let (status, body) = self
            .post(
                "/api/wizard",
                serde_json::json!({ "movie_id": movie_id, "ticket_count": ticket_count }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["session_id"].as_str().unwrap().to_string()
    }

    /// Drives a fresh Dune wizard to the payment step with `seats` picked.
    pub async fn wizard_at_payment(&self, seats: &[&str]) -> String {
        let session = self.open_wizard(self.fixture.dune, seats.len() as i64).await;

        let (status, body) = self
            .post(
                &format!("/api/wizard/{}/showtime", session),
                serde_json::json!({ "showtime_id": self.fixture.dune_today }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");

        for seat in seats {
            let (status, body) = self
                .request(Method::POST, &format!("/api/wizard/{}/seats/{}", session, seat), None, None)
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
        }

        let (status, body) = self
            .request(Method::POST, &format!("/api/wizard/{}/seats/confirm", session), None, None)
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["step"], "payment");

        session
    }
}

pub fn card_details() -> Value {
    serde_json::json!({
        "card_number": "4111111111111111",
        "expiry_date": "1229",
        "cvv": "123",
        "name_on_card": "Asha Rao"
    })
}
