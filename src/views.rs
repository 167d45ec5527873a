//! JSON shapes of the wizard screens and the ticket.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::backend::BookingBackend;
use crate::booking::seat::{SeatCode, ROWS, SEATS_PER_ROW};
use crate::booking::wizard::{PaymentStep, SeatsStep, ShowtimesStep};
use crate::booking::{BookingReceipt, SeatSelection, SeatState, WizardStep};
use crate::catalog::{self, TheaterShowtimes};
use crate::entities::{movie, showtime, theater};
use crate::error::AppResult;

#[derive(Debug, Serialize)]
pub struct SeatView {
    pub code: SeatCode,
    pub state: SeatState,
}

#[derive(Debug, Serialize)]
pub struct SeatRowView {
    pub row: char,
    pub seats: Vec<SeatView>,
}

/// The auditorium grid, row by row, with each seat's state for this session.
pub fn seat_rows(selection: &SeatSelection) -> Vec<SeatRowView> {
    ROWS.iter()
        .map(|&row| {
            let seats = (1..=SEATS_PER_ROW)
                .filter_map(|number| SeatCode::new(row, number))
                .map(|code| SeatView {
                    code,
                    state: selection.seat_state(code),
                })
                .collect();
            SeatRowView { row, seats }
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum StepView {
    Closed,
    Showtimes {
        movie: movie::Model,
        ticket_count: u8,
        date: NaiveDate,
        dates: Vec<NaiveDate>,
        theaters: Vec<TheaterShowtimes>,
    },
    Seats {
        movie: movie::Model,
        ticket_count: u8,
        date: NaiveDate,
        theater: theater::Model,
        showtime: showtime::Model,
        rows: Vec<SeatRowView>,
        selected: Vec<SeatCode>,
        total_amount: Decimal,
        can_confirm: bool,
    },
    Payment {
        movie: movie::Model,
        ticket_count: u8,
        date: NaiveDate,
        theater: theater::Model,
        showtime: showtime::Model,
        seats: Vec<SeatCode>,
        total_amount: Decimal,
    },
    Confirmation {
        receipt: BookingReceipt,
    },
}

#[derive(Debug, Serialize)]
pub struct WizardView {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub step: StepView,
}

impl WizardView {
    /// Renders the current step. The showtimes step lists every theater
    /// playing the movie on the selected date.
    pub async fn build(
        session_id: Uuid,
        step: &WizardStep,
        backend: &dyn BookingBackend,
        today: NaiveDate,
    ) -> AppResult<Self> {
        let step = match step {
            WizardStep::Closed => StepView::Closed,
            WizardStep::Showtimes(step) => showtimes_view(step, backend, today).await?,
            WizardStep::Seats(step) => seats_view(step),
            WizardStep::Payment(step) => payment_view(step),
            WizardStep::Confirmation(receipt) => StepView::Confirmation {
                receipt: receipt.clone(),
            },
        };

        Ok(Self { session_id, step })
    }
}

async fn showtimes_view(
    step: &ShowtimesStep,
    backend: &dyn BookingBackend,
    today: NaiveDate,
) -> AppResult<StepView> {
    let theaters = catalog::theater_listing(backend, step.movie.id, Some(step.date)).await?;

    Ok(StepView::Showtimes {
        movie: step.movie.clone(),
        ticket_count: step.ticket_count.into(),
        date: step.date,
        dates: catalog::upcoming_dates(today),
        theaters,
    })
}

fn seats_view(step: &SeatsStep) -> StepView {
    let selection = &step.selection;

    StepView::Seats {
        movie: step.movie.clone(),
        ticket_count: selection.ticket_count().into(),
        date: step.date,
        theater: step.theater.clone(),
        showtime: step.showtime.clone(),
        rows: seat_rows(selection),
        selected: selection.selected().to_vec(),
        total_amount: selection.total_amount(step.showtime.price),
        can_confirm: selection.can_confirm(),
    }
}

fn payment_view(step: &PaymentStep) -> StepView {
    StepView::Payment {
        movie: step.movie.clone(),
        ticket_count: step.ticket_count.into(),
        date: step.date,
        theater: step.theater.clone(),
        showtime: step.showtime.clone(),
        seats: step.seats.clone(),
        total_amount: step.total_amount(),
    }
}

/// Printable ticket for a confirmed booking.
#[derive(Debug, Serialize, PartialEq)]
pub struct TicketDocument {
    pub booking_reference: String,
    pub movie: String,
    pub theater: String,
    pub address: String,
    pub date: String,
    pub time: String,
    pub seats: Vec<SeatCode>,
    pub ticket_count: usize,
    pub unit_price: Decimal,
    pub total: Decimal,
}

impl From<&BookingReceipt> for TicketDocument {
    fn from(receipt: &BookingReceipt) -> Self {
        Self {
            booking_reference: receipt.booking_reference.clone(),
            movie: receipt.movie.title.clone(),
            theater: receipt.theater.name.clone(),
            address: receipt.theater.address.clone(),
            date: receipt.showtime.show_date.format("%A, %B %-d, %Y").to_string(),
            time: receipt.showtime.show_time.format("%-I:%M %p").to_string(),
            seats: receipt.seats.clone(),
            ticket_count: receipt.seats.len(),
            unit_price: receipt.showtime.price,
            total: receipt.total_amount,
        }
    }
}
