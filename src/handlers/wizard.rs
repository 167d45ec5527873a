use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::payment::PaymentDetails;
use crate::booking::{BookingWizard, PaymentContext, SeatCode, SeatToggle, TicketCount, WizardStep};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::MaybeAuthUser;
use crate::views::{TicketDocument, WizardView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct OpenWizardRequest {
    pub movie_id: Uuid,
    pub ticket_count: TicketCount,
}

#[derive(Debug, Deserialize)]
pub struct SelectDateRequest {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SelectShowtimeRequest {
    pub showtime_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct SeatToggleResponse {
    pub toggle: SeatToggle,
    #[serde(flatten)]
    pub view: WizardView,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn render(state: &AppState, session_id: Uuid, wizard: &BookingWizard) -> AppResult<WizardView> {
    WizardView::build(session_id, wizard.step(), state.backend.as_ref(), today()).await
}

/// Start booking a movie
pub async fn open(
    State(state): State<AppState>,
    Json(payload): Json<OpenWizardRequest>,
) -> AppResult<(StatusCode, Json<WizardView>)> {
    let movie = state
        .backend
        .find_movie(payload.movie_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut wizard = BookingWizard::new();
    wizard.open(movie, payload.ticket_count, today())?;

    let view_wizard = wizard.clone();
    let session_id = state.sessions.insert(wizard).await;
    tracing::debug!(%session_id, movie_id = %payload.movie_id, "Booking wizard opened");

    let view = render(&state, session_id, &view_wizard).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    Ok(Json(render(&state, id, &session.wizard).await?))
}

pub async fn select_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectDateRequest>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    session.wizard.select_date(payload.date, today())?;
    Ok(Json(render(&state, id, &session.wizard).await?))
}

/// Pick a showtime and move on to the seat map
pub async fn select_showtime(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectShowtimeRequest>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    if !matches!(session.wizard.step(), WizardStep::Showtimes(_)) {
        return Err(AppError::InvalidTransition(format!(
            "Cannot pick a showtime while on the {} step",
            session.wizard.step().name()
        )));
    }

    let backend = state.backend.as_ref();
    let showtime = backend
        .find_showtime(payload.showtime_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Showtime not found".to_string()))?;
    let theater = backend
        .find_theater(showtime.theater_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Theater not found".to_string()))?;

    session.wizard.select_showtime(theater, showtime)?;
    Ok(Json(render(&state, id, &session.wizard).await?))
}

/// Click on a seat
pub async fn toggle_seat(
    State(state): State<AppState>,
    Path((id, code)): Path<(Uuid, String)>,
) -> AppResult<Json<SeatToggleResponse>> {
    let seat: SeatCode = code.parse()?;

    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    let toggle = session.wizard.toggle_seat(seat)?;
    let view = render(&state, id, &session.wizard).await?;
    Ok(Json(SeatToggleResponse { toggle, view }))
}

pub async fn confirm_seats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    session.wizard.confirm_seats()?;
    Ok(Json(render(&state, id, &session.wizard).await?))
}

/// Pay for the selected seats. The session stays locked for the whole
/// simulated processing time.
pub async fn submit_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    user: MaybeAuthUser,
    Json(details): Json<PaymentDetails>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    let ctx = PaymentContext::new(
        state.backend.as_ref(),
        user.user_id(),
        state.config.payment_delay(),
    );
    session.wizard.submit_payment(ctx, details).await?;
    session.touch();

    Ok(Json(render(&state, id, &session.wizard).await?))
}

pub async fn back(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<WizardView>> {
    let session = state.sessions.get(id).await?;
    let mut session = session.lock().await;
    session.touch();

    session.wizard.back()?;
    Ok(Json(render(&state, id, &session.wizard).await?))
}

/// Ticket of a confirmed booking
pub async fn ticket(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<TicketDocument>> {
    let session = state.sessions.get(id).await?;
    let session = session.lock().await;

    match session.wizard.step() {
        WizardStep::Confirmation(receipt) => Ok(Json(TicketDocument::from(receipt))),
        other => Err(AppError::InvalidTransition(format!(
            "No ticket yet, the booking is on the {} step",
            other.name()
        ))),
    }
}

/// Close the wizard and forget the session
pub async fn close(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let session = state.sessions.get(id).await?;
    session.lock().await.wizard.close();
    state.sessions.remove(id).await;

    tracing::debug!(session_id = %id, "Booking wizard closed");
    Ok(StatusCode::NO_CONTENT)
}
